//! A mesh document with all-or-nothing edit operations.
//!
//! Every edit made between [`Document::start_operation`] and
//! [`Document::commit_operation`] is kept or discarded as a unit.
//! [`Document::abort_operation`] restores the entities exactly as they were
//! when the operation started.

use tracing::{debug, info, warn};

use crate::entities::Entities;
use crate::error::{MeshError, MeshResult};

#[derive(Debug)]
struct OpenOperation {
    name: String,
    snapshot: Entities,
}

/// Root container of a model plus its operation state.
#[derive(Debug, Default)]
pub struct Document {
    entities: Entities,
    active: Option<OpenOperation>,
    history: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing entities in a document.
    pub fn with_entities(entities: Entities) -> Self {
        Self {
            entities,
            ..Self::default()
        }
    }

    #[inline]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Mutable access to the root entities.
    ///
    /// Edits made outside an operation cannot be aborted.
    #[inline]
    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }

    pub fn into_entities(self) -> Entities {
        self.entities
    }

    /// Name of the open operation, if any.
    pub fn active_operation(&self) -> Option<&str> {
        self.active.as_ref().map(|op| op.name.as_str())
    }

    /// Names of committed operations, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Open a new operation.
    ///
    /// # Errors
    ///
    /// [`MeshError::OperationInProgress`] if an operation is already open;
    /// operations do not nest.
    pub fn start_operation(&mut self, name: impl Into<String>) -> MeshResult<()> {
        if let Some(open) = &self.active {
            return Err(MeshError::OperationInProgress {
                active: open.name.clone(),
            });
        }
        let name = name.into();
        debug!(operation = %name, "Starting operation");
        self.active = Some(OpenOperation {
            name,
            snapshot: self.entities.clone(),
        });
        Ok(())
    }

    /// Keep every edit made since the operation started.
    pub fn commit_operation(&mut self) -> MeshResult<()> {
        let open = self.active.take().ok_or(MeshError::NoActiveOperation)?;
        info!(operation = %open.name, "Committed operation");
        self.history.push(open.name);
        Ok(())
    }

    /// Discard every edit made since the operation started.
    pub fn abort_operation(&mut self) -> MeshResult<()> {
        let open = self.active.take().ok_or(MeshError::NoActiveOperation)?;
        warn!(operation = %open.name, "Aborted operation, restoring previous state");
        self.entities = open.snapshot;
        Ok(())
    }

    /// Run `edit` inside an operation, committing on `Ok` and aborting on
    /// `Err`.
    ///
    /// Errors from opening or committing the operation are converted into
    /// the closure's error type.
    pub fn transaction<T, E, F>(&mut self, name: impl Into<String>, edit: F) -> Result<T, E>
    where
        E: From<MeshError>,
        F: FnOnce(&mut Entities) -> Result<T, E>,
    {
        self.start_operation(name)?;
        match edit(&mut self.entities) {
            Ok(value) => {
                self.commit_operation()?;
                Ok(value)
            }
            Err(e) => {
                self.abort_operation()?;
                Err(e)
            }
        }
    }
}

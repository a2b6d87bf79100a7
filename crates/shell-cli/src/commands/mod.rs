//! Subcommand implementations.

pub mod info;
pub mod offset;
pub mod shell;

use std::path::Path;

use anyhow::{Context, Result, bail};
use mesh_graph::{Document, Entities, GroupId};

pub(crate) fn load(input: &Path) -> Result<Document> {
    mesh_graph::load_document(input)
        .with_context(|| format!("Failed to load mesh from {:?}", input))
}

/// Root groups of `entities`, or only the one named `name`.
pub(crate) fn select_groups(entities: &Entities, name: Option<&str>) -> Result<Vec<GroupId>> {
    let groups: Vec<GroupId> = entities
        .groups()
        .filter(|(_, group)| name.is_none_or(|n| group.display_name() == n))
        .map(|(id, _)| id)
        .collect();

    if groups.is_empty() {
        match name {
            Some(n) => bail!("No group named {:?}", n),
            None => bail!("The file contains no groups"),
        }
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_graph::{Group, Point3};

    fn two_groups() -> Entities {
        let mut tile = Entities::new();
        tile.add_face(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let mut root = Entities::new();
        let mut named = Group::named("tile");
        named.entities = tile.clone();
        root.add_group(named);
        root.add_group(Group::with_entities(tile));
        root
    }

    #[test]
    fn test_select_all_groups() {
        let root = two_groups();
        assert_eq!(select_groups(&root, None).unwrap().len(), 2);
    }

    #[test]
    fn test_select_group_by_name() {
        let root = two_groups();
        let selected = select_groups(&root, Some("tile")).unwrap();
        assert_eq!(selected, [GroupId(0)]);

        let err = select_groups(&root, Some("missing")).unwrap_err();
        assert!(err.to_string().contains("No group named"));
    }

    #[test]
    fn test_no_groups_is_an_error() {
        assert!(select_groups(&Entities::new(), None).is_err());
    }
}

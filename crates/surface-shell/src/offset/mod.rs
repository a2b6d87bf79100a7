//! Per-vertex offset computation.

mod map;
mod vertex;

pub use map::OffsetMap;
pub use vertex::{IncidentFace, OffsetCase, offset_vertex, offset_vertex_detailed, resolve_offset};

//! Shell construction from a polygon surface.

mod attributes;
mod border;
mod collect;
mod generate;

pub use attributes::copy_soft_smooth;
pub use border::{BorderFace, add_border_face};
pub use collect::{CollectedMesh, collect_mesh};
pub use generate::{
    ShellOutput, ShellRun, ShellStats, compute_shell, compute_shell_with_progress,
    operation_name, shell_groups, shell_groups_with_progress,
};

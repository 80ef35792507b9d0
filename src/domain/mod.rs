//! Pure business rules: roles and scope, task state, status derivation,
//! task visibility, review sampling. Nothing in here touches the database.

pub mod error;
pub mod record;
pub mod review;
pub mod role;
pub mod sampling;
pub mod scope;
pub mod status;
pub mod transition;
pub mod user;
pub mod visibility;

pub use error::DomainError;
pub use record::{fan_out, NewDeathRecord, NewTask};
pub use review::ReviewSubmission;
pub use role::{Role, ScopeKind};
pub use scope::{RecordLocation, ViewerScope};
pub use status::{Status, StatusCounts};
pub use transition::TaskState;
pub use user::{resolve_registration, PhoneOwner, Registration};
pub use visibility::{display_types, project_tasks, Authorization, TaskView};

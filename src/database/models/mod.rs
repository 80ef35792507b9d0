pub mod death;
pub mod geo;
pub mod review;
pub mod task;
pub mod user;

pub use death::{DeathCountsRow, DeathListingRow, GraphPointRow};
pub use geo::{BlockRow, GaonRef, GaonRow, GramPanchayatRow, ScopedGramPanchayatRow, TehsilRow, TehsilWithSdmRow};
pub use review::DeathReviewRow;
pub use task::{TaskRow, TaskTypeRow};
pub use user::{DistrictPostRow, OtpRow, RoleRow, SessionRow, UserRow};

// handlers/protected/mod.rs - endpoints for any logged-in user
//
// Route prefix: /gram-panchayat/user/*
// Middleware:   jwt_auth_middleware (token + live session + active user)
//
// Handlers take a `Viewer`, which carries the caller's geographic scope and
// the task types its role may act on.

pub mod death;
pub mod task;
pub mod user;

pub use death::{list_completed, list_new, list_processing, register};
pub use task::{complete, start_processing};
pub use user::{info, logout};

//! Request-level operations. Each service owns a [`Database`](crate::database::Database)
//! handle and reports failures as [`ApiError`](crate::error::ApiError).

pub mod auth_service;
pub mod dashboard_service;
pub mod death_service;
pub mod onboarding_service;
pub mod review_service;
pub mod task_service;
pub mod viewer;

pub use auth_service::AuthService;
pub use dashboard_service::DashboardService;
pub use death_service::DeathService;
pub use onboarding_service::OnboardingService;
pub use review_service::ReviewService;
pub use task_service::{TaskAction, TaskService};
pub use viewer::Viewer;

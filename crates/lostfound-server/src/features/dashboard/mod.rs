//! Dashboard overview for the back-office landing page

pub mod queries;
pub mod routes;

pub use queries::{DashboardOverviewError, DashboardOverviewQuery, DashboardOverviewResponse};
pub use routes::dashboard_routes;

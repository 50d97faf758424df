//! Administration back-office: statistics, users, activity log and reports

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateUserCommand, CreateUserError, CreateUserResponse};
pub use queries::{
    ActivityLogError, ActivityLogResponse, AdminStatisticsError, AdminStatisticsQuery,
    AdminStatisticsResponse, GetCurrentUserError, GetCurrentUserQuery, GetCurrentUserResponse,
    ListUsersError, ListUsersQuery, ListUsersResponse, ReportedItemsError, ReportedItemsQuery,
    ReportedItemsResponse,
};
pub use routes::admin_routes;

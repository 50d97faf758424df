pub mod activity_log;
pub mod current_user;
pub mod list_users;
pub mod reported_items;
pub mod statistics;

pub use activity_log::{ActivityLogError, ActivityLogResponse};
pub use current_user::{GetCurrentUserError, GetCurrentUserQuery, GetCurrentUserResponse};
pub use list_users::{ListUsersError, ListUsersQuery, ListUsersResponse};
pub use reported_items::{ReportedItemsError, ReportedItemsQuery, ReportedItemsResponse};
pub use statistics::{AdminStatisticsError, AdminStatisticsQuery, AdminStatisticsResponse};

pub mod overview;

pub use overview::{
    DashboardOverviewError, DashboardOverviewQuery, DashboardOverviewResponse, RECENT_ITEMS_LIMIT,
};

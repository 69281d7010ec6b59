//! Dashboard port — the combined energy snapshot and device summary query.

use std::future::Future;
use std::sync::Arc;

use wattdesk_domain::energy::DashboardData;
use wattdesk_domain::error::WattdeskError;

/// Fetches everything the dashboard shows in one round trip.
pub trait DashboardSource: Send + Sync {
    /// Query the current snapshot and every device summary.
    fn fetch_dashboard(&self) -> impl Future<Output = Result<DashboardData, WattdeskError>> + Send;
}

impl<T: DashboardSource> DashboardSource for Arc<T> {
    fn fetch_dashboard(&self) -> impl Future<Output = Result<DashboardData, WattdeskError>> + Send {
        (**self).fetch_dashboard()
    }
}

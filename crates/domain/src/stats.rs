//! Aggregate device counts computed server-side.

use serde::{Deserialize, Serialize};

/// Device counts by status for the current user's visible devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub total: u32,
    pub online: u32,
    pub offline: u32,
    pub error: u32,
}

impl DeviceStats {
    /// Share of devices online, in percent. Zero when there are no devices.
    #[must_use]
    pub fn online_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.online) / f64::from(self.total) * 100.0
    }
}

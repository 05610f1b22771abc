//! Driving port for the administrator dashboard.

use async_trait::async_trait;

use crate::domain::{DashboardSummary, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Aggregate counts across the service.
    async fn summary(&self) -> Result<DashboardSummary, Error>;
}

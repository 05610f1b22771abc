//! Port abstraction for dashboard aggregates.

use async_trait::async_trait;

use crate::domain::DashboardSummary;

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Count records across every table.
    async fn summary(&self) -> Result<DashboardSummary, RecordStoreError>;
}

//! Administrator dashboard.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{DashboardRepository, DashboardService};
use crate::domain::{DashboardSummary, Error};

/// Service implementing the [`DashboardService`] driving port.
pub struct DashboardReporter<R> {
    store: Arc<R>,
}

impl<R> DashboardReporter<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R> DashboardService for DashboardReporter<R>
where
    R: DashboardRepository,
{
    async fn summary(&self) -> Result<DashboardSummary, Error> {
        self.store
            .summary()
            .await
            .map_err(|err| err.into_domain("dashboard"))
    }
}

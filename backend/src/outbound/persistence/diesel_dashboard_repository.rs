//! PostgreSQL-backed `DashboardRepository`.

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DashboardRepository, RecordStoreError};
use crate::domain::{
    BillStatus, ComplaintStatus, DashboardSummary, FixedPoint, PaymentStatus,
    ServiceRequestStatus,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;

/// Every aggregate in one round trip. `SUM` over `BIGINT` yields `NUMERIC`,
/// hence the cast.
const SUMMARY_SQL: &str = "\
SELECT
    (SELECT COUNT(*) FROM citizens) AS citizens_total,
    (SELECT COUNT(*) FROM bills) AS bills_total,
    (SELECT COUNT(*) FROM bills WHERE status = $1) AS bills_pending,
    (SELECT COUNT(*) FROM payments WHERE status = $2) AS payments_total,
    (SELECT COALESCE(SUM(amount_paise), 0)::BIGINT FROM payments WHERE status = $2)
        AS payments_revenue_paise,
    (SELECT COUNT(*) FROM complaints) AS complaints_total,
    (SELECT COUNT(*) FROM complaints WHERE status = $3) AS complaints_pending,
    (SELECT COUNT(*) FROM complaints WHERE status = $4) AS complaints_in_progress,
    (SELECT COUNT(*) FROM complaints WHERE status = $5) AS complaints_resolved,
    (SELECT COUNT(*) FROM service_requests) AS service_requests_total,
    (SELECT COUNT(*) FROM service_requests WHERE status = $6) AS service_requests_pending";

#[derive(Debug, QueryableByName)]
struct SummaryRow {
    #[diesel(sql_type = BigInt)]
    citizens_total: i64,
    #[diesel(sql_type = BigInt)]
    bills_total: i64,
    #[diesel(sql_type = BigInt)]
    bills_pending: i64,
    #[diesel(sql_type = BigInt)]
    payments_total: i64,
    #[diesel(sql_type = BigInt)]
    payments_revenue_paise: i64,
    #[diesel(sql_type = BigInt)]
    complaints_total: i64,
    #[diesel(sql_type = BigInt)]
    complaints_pending: i64,
    #[diesel(sql_type = BigInt)]
    complaints_in_progress: i64,
    #[diesel(sql_type = BigInt)]
    complaints_resolved: i64,
    #[diesel(sql_type = BigInt)]
    service_requests_total: i64,
    #[diesel(sql_type = BigInt)]
    service_requests_pending: i64,
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

impl From<SummaryRow> for DashboardSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            citizens_total: count(row.citizens_total),
            bills_total: count(row.bills_total),
            bills_pending: count(row.bills_pending),
            payments_total: count(row.payments_total),
            payments_revenue: FixedPoint::from_hundredths(row.payments_revenue_paise),
            complaints_total: count(row.complaints_total),
            complaints_pending: count(row.complaints_pending),
            complaints_in_progress: count(row.complaints_in_progress),
            complaints_resolved: count(row.complaints_resolved),
            service_requests_total: count(row.service_requests_total),
            service_requests_pending: count(row.service_requests_pending),
        }
    }
}

/// Diesel implementation of the [`DashboardRepository`] port.
#[derive(Clone)]
pub struct DieselDashboardRepository {
    pool: DbPool,
}

impl DieselDashboardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for DieselDashboardRepository {
    async fn summary(&self) -> Result<DashboardSummary, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SummaryRow = sql_query(SUMMARY_SQL)
            .bind::<Text, _>(BillStatus::Pending.as_str())
            .bind::<Text, _>(PaymentStatus::Success.as_str())
            .bind::<Text, _>(ComplaintStatus::Submitted.as_str())
            .bind::<Text, _>(ComplaintStatus::InProgress.as_str())
            .bind::<Text, _>(ComplaintStatus::Resolved.as_str())
            .bind::<Text, _>(ServiceRequestStatus::Submitted.as_str())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_row_converts_paise_to_rupees() {
        let row = SummaryRow {
            citizens_total: 3,
            bills_total: 5,
            bills_pending: 2,
            payments_total: 2,
            payments_revenue_paise: 150_050,
            complaints_total: 1,
            complaints_pending: 1,
            complaints_in_progress: 0,
            complaints_resolved: 0,
            service_requests_total: 0,
            service_requests_pending: 0,
        };
        let summary = DashboardSummary::from(row);
        assert_eq!(summary.citizens_total, 3);
        assert_eq!(summary.payments_revenue.to_string(), "1500.50");
    }
}

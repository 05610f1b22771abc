//! Aggregate counts for the administrator dashboard.

use super::fixed_point::FixedPoint;

/// Snapshot of record counts across the service.
///
/// "Pending" means `pending` for bills and `submitted` for complaints and
/// service requests. Payment totals only count successful payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub citizens_total: u64,
    pub bills_total: u64,
    pub bills_pending: u64,
    pub payments_total: u64,
    pub payments_revenue: FixedPoint,
    pub complaints_total: u64,
    pub complaints_pending: u64,
    pub complaints_in_progress: u64,
    pub complaints_resolved: u64,
    pub service_requests_total: u64,
    pub service_requests_pending: u64,
}

//! Prometheus request metrics served at `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::{Result, eyre};

/// Build the request metrics middleware. Orchestration probes are excluded.
pub(crate) fn build_metrics() -> Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("suvidha")
        .endpoint("/metrics")
        .exclude("/health/ready")
        .exclude("/health/live")
        .build()
        .map_err(|err| eyre!("failed to configure Prometheus metrics: {err}"))
}

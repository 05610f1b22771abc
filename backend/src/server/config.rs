//! Runtime options for [`create_server`](super::create_server).

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Listener address, time source and optional metrics middleware.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) clock: Arc<dyn Clock>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Listen on `bind_addr`; handlers read time from `clock`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, clock: Arc<dyn Clock>) -> Self {
        Self {
            bind_addr,
            clock,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Wrap every worker in the given Prometheus middleware.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}

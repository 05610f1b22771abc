//! Health endpoints: orchestration probes plus the public API banner.
//!
//! `/health/ready` and `/health/live` sit outside the `/api` scope and return
//! bare status codes with `Cache-Control: no-store`. `/api/` and
//! `/api/health` are the JSON endpoints kiosk clients poll.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

/// Shared readiness and liveness flags.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Start live but not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready once the listener is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes while draining.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe. `503` until startup completes.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. `503` once [`HealthState::mark_unhealthy`] has been called.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

pub const API_BANNER: &str =
    "SUVIDHA API v1.0 - Smart Urban Virtual Interactive Digital Helpdesk Assistant";

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiBanner {
    #[schema(example = "SUVIDHA API v1.0 - Smart Urban Virtual Interactive Digital Helpdesk Assistant")]
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiHealth {
    #[schema(example = "healthy")]
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/api/",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "API banner", body = ApiBanner))
)]
#[get("/")]
pub async fn banner() -> web::Json<ApiBanner> {
    web::Json(ApiBanner {
        message: API_BANNER,
    })
}

/// JSON health check with the server's current time.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Service is healthy", body = ApiHealth))
)]
#[get("/health")]
pub async fn api_health(clock: web::Data<dyn Clock>) -> web::Json<ApiHealth> {
    web::Json(ApiHealth {
        status: "healthy",
        timestamp: clock.utc(),
    })
}

//! HTTP server assembly: shared state, route tables and middleware.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::build_metrics;
pub(crate) use state_builders::build_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::Clock;

use suvidha::Trace;
#[cfg(debug_assertions)]
use suvidha::doc::ApiDoc;
use suvidha::inbound::http::health::HealthState;
use suvidha::inbound::http::routes::{configure_api, configure_probes};
use suvidha::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Per-worker handles cloned into every `App` instance.
#[derive(Clone)]
struct SharedData {
    probes: web::Data<HealthState>,
    services: web::Data<HttpState>,
    clock: web::Data<dyn Clock>,
}

impl SharedData {
    fn into_app(
        self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let app = App::new()
            .app_data(self.probes)
            .app_data(self.services)
            .app_data(self.clock)
            .wrap(Trace)
            .configure(configure_api)
            .configure(configure_probes);

        // Interactive docs are a development aid only.
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    }
}

/// Bind the SUVIDHA API and start serving.
///
/// The readiness probe flips to ready once the socket is bound.
///
/// # Errors
/// Returns [`std::io::Error`] when binding fails, or when the `metrics`
/// feature is enabled but no Prometheus middleware was supplied.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        clock,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    #[cfg(feature = "metrics")]
    let prometheus = prometheus
        .ok_or_else(|| std::io::Error::other("metrics middleware was not configured"))?;

    let shared = SharedData {
        probes: health_state.clone(),
        services: web::Data::new(http_state),
        clock: web::Data::from(clock),
    };

    let server = HttpServer::new(move || {
        let app = shared.clone().into_app();
        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());
        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

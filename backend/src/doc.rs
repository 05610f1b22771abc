//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer together with
//! the external error schemas and the bearer security scheme. The document is
//! served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token from POST /api/auth/verify-otp or POST /api/auth/admin/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SUVIDHA API",
        description = "Citizen services helpdesk: utility bills, payments, service requests, complaints, notifications and announcements."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::health::banner,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::login::send_otp,
        crate::inbound::http::login::verify_otp,
        crate::inbound::http::login::admin_login,
        crate::inbound::http::citizen::get_profile,
        crate::inbound::http::citizen::update_profile,
        crate::inbound::http::bills::list_bills,
        crate::inbound::http::bills::list_pending_bills,
        crate::inbound::http::bills::get_bill,
        crate::inbound::http::payments::pay_bill,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::payments::get_receipt,
        crate::inbound::http::service_requests::submit_service_request,
        crate::inbound::http::service_requests::list_service_requests,
        crate::inbound::http::service_requests::get_service_request,
        crate::inbound::http::complaints::file_complaint,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::get_complaint,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::announcements::list_announcements,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::list_citizens,
        crate::inbound::http::admin::list_all_bills,
        crate::inbound::http::admin::create_bill,
        crate::inbound::http::admin::list_all_payments,
        crate::inbound::http::admin::list_all_complaints,
        crate::inbound::http::admin::update_complaint,
        crate::inbound::http::admin::list_all_service_requests,
        crate::inbound::http::admin::update_service_request,
        crate::inbound::http::admin::list_all_announcements,
        crate::inbound::http::admin::create_announcement,
        crate::inbound::http::admin::delete_announcement,
        crate::inbound::http::admin::send_notification,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "OTP and administrator login"),
        (name = "citizen", description = "Citizen profile"),
        (name = "bills", description = "Utility bills"),
        (name = "payments", description = "Bill payments and receipts"),
        (name = "service-requests", description = "Utility service requests"),
        (name = "complaints", description = "Grievances"),
        (name = "notifications", description = "Citizen notifications"),
        (name = "announcements", description = "Public announcements"),
        (name = "admin", description = "Administrator operations"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

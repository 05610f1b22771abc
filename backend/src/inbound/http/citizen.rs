//! Citizen profile handlers.
//!
//! ```text
//! GET /api/citizen/profile
//! PUT /api/citizen/profile {"name":"Asha","city":"Pune"}
//! ```

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Citizen, CitizenProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::acknowledgement::Acknowledgement;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::optional_text;

/// Citizen account as returned to its owner and to administrators.
#[derive(Debug, Serialize, ToSchema)]
pub struct CitizenView {
    pub id: Uuid,
    #[schema(example = "9876543210")]
    pub mobile: String,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    #[schema(example = "en")]
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Citizen> for CitizenView {
    fn from(value: Citizen) -> Self {
        Self {
            id: *value.id.as_uuid(),
            mobile: value.mobile,
            name: value.name,
            aadhaar_number: value.aadhaar_number,
            email: value.email,
            address: value.address,
            city: value.city,
            state: value.state,
            pincode: value.pincode,
            language: value.language,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Body for `PUT /api/citizen/profile`.
///
/// Every editable field is replaced; omitted fields are cleared. `mobile` is
/// accepted for client compatibility but never changes the account's number.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileRequest {
    pub mobile: Option<String>,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub language: Option<String>,
}

impl From<ProfileRequest> for CitizenProfile {
    fn from(value: ProfileRequest) -> Self {
        Self {
            name: optional_text(value.name),
            aadhaar_number: optional_text(value.aadhaar_number),
            email: optional_text(value.email),
            address: optional_text(value.address),
            city: optional_text(value.city),
            state: optional_text(value.state),
            pincode: optional_text(value.pincode),
            language: optional_text(value.language),
        }
    }
}

/// Read the caller's profile.
#[utoipa::path(
    get,
    path = "/api/citizen/profile",
    responses(
        (status = 200, description = "Profile", body = CitizenView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Citizen not found", body = ErrorSchema)
    ),
    tags = ["citizen"],
    operation_id = "getProfile"
)]
#[get("/citizen/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<CitizenView>> {
    let citizen = state.citizens.profile(&session.citizen_id()).await?;
    Ok(web::Json(citizen.into()))
}

/// Replace the caller's editable profile fields.
#[utoipa::path(
    put,
    path = "/api/citizen/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Acknowledgement),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Citizen not found", body = ErrorSchema)
    ),
    tags = ["citizen"],
    operation_id = "updateProfile"
)]
#[put("/citizen/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: CitizenSession,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<Acknowledgement>> {
    let profile = CitizenProfile::from(payload.into_inner());
    state
        .citizens
        .update_profile(&session.citizen_id(), &profile)
        .await?;
    Ok(web::Json(Acknowledgement::new("Profile updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CitizenId, Principal};
    use crate::inbound::http::test_utils::{TestPorts, gate_resolving};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn citizen(id: CitizenId) -> Citizen {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 5, 9, 30, 0)
            .single()
            .expect("valid instant");
        Citizen {
            id,
            mobile: "9876543210".into(),
            name: Some("Asha".into()),
            aadhaar_number: None,
            email: None,
            address: Some("12 MG Road".into()),
            city: Some("Pune".into()),
            state: None,
            pincode: None,
            language: "hi".into(),
            external_subject: Some("idp|secret".into()),
            created_at: at,
            updated_at: at,
        }
    }

    fn ports_for(id: CitizenId) -> TestPorts {
        let mut ports = TestPorts::default();
        ports.auth = gate_resolving(Principal::citizen(id));
        ports
    }

    #[actix_web::test]
    async fn profile_is_read_for_the_token_subject() {
        let id = CitizenId::random();
        let mut ports = ports_for(id);
        ports
            .citizens
            .expect_profile()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(citizen(id)));
        let app = actix_test::init_service(
            ports
                .into_app()
                .service(web::scope("/api").service(get_profile)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/citizen/profile")
            .insert_header(("Authorization", "Bearer token"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["mobile"], "9876543210");
        assert_eq!(body["language"], "hi");
        assert!(body.get("external_subject").is_none());
    }

    #[actix_web::test]
    async fn profile_requires_a_token() {
        let app = actix_test::init_service(
            TestPorts::default()
                .into_app()
                .service(web::scope("/api").service(get_profile)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/citizen/profile")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn update_replaces_fields_and_trims_blanks() {
        let id = CitizenId::random();
        let mut ports = ports_for(id);
        ports
            .citizens
            .expect_update_profile()
            .withf(move |requested, profile| {
                *requested == id
                    && profile.name.as_deref() == Some("Asha K")
                    && profile.city.is_none()
                    && profile.language.as_deref() == Some("mr")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let app = actix_test::init_service(
            ports
                .into_app()
                .service(web::scope("/api").service(update_profile)),
        )
        .await;
        let req = actix_test::TestRequest::put()
            .uri("/api/citizen/profile")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(json!({
                "mobile": "1111111111",
                "name": "Asha K",
                "city": "  ",
                "language": "mr"
            }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Profile updated successfully");
    }
}

//! Login API handlers.
//!
//! ```text
//! POST /api/auth/send-otp {"mobile":"9876543210"}
//! POST /api/auth/verify-otp {"mobile":"9876543210","otp":"123456"}
//! POST /api/auth/admin/login {"username":"admin","password":"secret"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::OtpLogin;
use crate::domain::{AdminCredentials, AuthSession, Error, MobileNumber, OtpCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_auth_validation_error, optional_text};

/// Body for `POST /api/auth/send-otp`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendOtpRequest {
    #[schema(example = "9876543210")]
    pub mobile: String,
}

/// Response for `POST /api/auth/send-otp`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SendOtpResponse {
    pub success: bool,
    #[schema(example = "OTP sent successfully")]
    pub message: String,
    /// Present only when the delivery channel is the fixed test code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Body for `POST /api/auth/verify-otp`.
///
/// `name`, `aadhaar_number` and `language` seed the profile the first time a
/// mobile number signs in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyOtpRequest {
    #[schema(example = "9876543210")]
    pub mobile: String,
    #[schema(example = "123456")]
    pub otp: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl TryFrom<VerifyOtpRequest> for OtpLogin {
    type Error = Error;

    fn try_from(value: VerifyOtpRequest) -> Result<Self, Self::Error> {
        let mobile = MobileNumber::parse(&value.mobile)
            .map_err(|err| map_auth_validation_error(&err))?;
        let otp = OtpCode::parse(&value.otp).map_err(|err| map_auth_validation_error(&err))?;
        Ok(Self {
            mobile,
            otp,
            name: optional_text(value.name),
            aadhaar_number: optional_text(value.aadhaar_number),
            language: optional_text(value.language),
        })
    }
}

/// Body for `POST /api/auth/admin/login`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminLoginRequest> for AdminCredentials {
    type Error = Error;

    fn try_from(value: AdminLoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
            .map_err(|err| map_auth_validation_error(&err))
    }
}

/// Bearer token issued by a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// `citizen` or `admin`.
    #[schema(example = "citizen")]
    pub user_type: String,
    pub user_id: Uuid,
    pub user_name: Option<String>,
}

impl From<AuthSession> for TokenResponse {
    fn from(value: AuthSession) -> Self {
        Self {
            access_token: value.access_token,
            token_type: "bearer".to_owned(),
            user_type: value.role.as_str().to_owned(),
            user_id: value.user_id,
            user_name: value.user_name,
        }
    }
}

/// Issue a one-time code to a mobile number.
#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code issued", body = SendOtpResponse),
        (status = 400, description = "Invalid mobile number", body = ErrorSchema),
        (status = 503, description = "Delivery or storage unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "sendOtp",
    security([])
)]
#[post("/auth/send-otp")]
pub async fn send_otp(
    state: web::Data<HttpState>,
    payload: web::Json<SendOtpRequest>,
) -> ApiResult<web::Json<SendOtpResponse>> {
    let mobile =
        MobileNumber::parse(&payload.mobile).map_err(|err| map_auth_validation_error(&err))?;
    let dispatch = state.login.send_otp(&mobile).await?;
    Ok(web::Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_owned(),
        hint: dispatch.hint,
    }))
}

/// Exchange a one-time code for a citizen token, provisioning the account on
/// first sign-in.
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Citizen token", body = TokenResponse),
        (status = 400, description = "Invalid or expired OTP", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "verifyOtp",
    security([])
)]
#[post("/auth/verify-otp")]
pub async fn verify_otp(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyOtpRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let login = OtpLogin::try_from(payload.into_inner())?;
    let session = state.login.verify_otp(login).await?;
    Ok(web::Json(session.into()))
}

/// Exchange administrator credentials for an admin token.
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin token", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/auth/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = AdminCredentials::try_from(payload.into_inner())?;
    let session = state.login.admin_login(&credentials).await?;
    Ok(web::Json(session.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::domain::ports::OtpDispatch;
    use crate::inbound::http::test_utils::TestPorts;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn session(role: Role) -> AuthSession {
        AuthSession {
            access_token: "signed.jwt.token".into(),
            role,
            user_id: Uuid::nil(),
            user_name: Some("Asha".into()),
        }
    }

    async fn post(ports: TestPorts, uri: &str, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            ports.into_app().service(
                web::scope("/api")
                    .service(send_otp)
                    .service(verify_otp)
                    .service(admin_login),
            ),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn send_otp_returns_hint_from_delivery_channel() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_send_otp()
            .withf(|mobile| mobile.as_str() == "9876543210")
            .times(1)
            .returning(|_| {
                Ok(OtpDispatch {
                    hint: Some("For testing, use OTP: 123456".into()),
                })
            });
        let (status, body) =
            post(ports, "/api/auth/send-otp", json!({"mobile": "9876543210"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "OTP sent successfully");
        assert_eq!(body["hint"], "For testing, use OTP: 123456");
    }

    #[rstest]
    #[case(json!({"mobile": "12345"}), "mobile")]
    #[case(json!({"mobile": "98765abcde"}), "mobile")]
    #[actix_web::test]
    async fn send_otp_rejects_malformed_mobile(#[case] body: Value, #[case] field: &str) {
        let mut ports = TestPorts::default();
        ports.login.expect_send_otp().never();
        let (status, body) = post(ports, "/api/auth/send-otp", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["context"]["field"], field);
    }

    #[actix_web::test]
    async fn verify_otp_issues_citizen_token() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_verify_otp()
            .withf(|login| {
                login.mobile.as_str() == "9876543210"
                    && login.otp.expose() == "123456"
                    && login.name.as_deref() == Some("Asha")
                    && login.language.is_none()
            })
            .times(1)
            .returning(|_| Ok(session(Role::Citizen)));
        let (status, body) = post(
            ports,
            "/api/auth/verify-otp",
            json!({"mobile": "9876543210", "otp": "123456", "name": " Asha ", "language": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["user_type"], "citizen");
        assert_eq!(body["access_token"], "signed.jwt.token");
        assert_eq!(body["user_name"], "Asha");
    }

    #[actix_web::test]
    async fn verify_otp_surfaces_rejection() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_verify_otp()
            .returning(|_| Err(Error::invalid_request("Invalid or expired OTP")));
        let (status, body) = post(
            ports,
            "/api/auth/verify-otp",
            json!({"mobile": "9876543210", "otp": "000000"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid or expired OTP");
    }

    #[actix_web::test]
    async fn admin_login_returns_admin_token() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_admin_login()
            .withf(|credentials| credentials.username() == "admin")
            .returning(|_| Ok(session(Role::Admin)));
        let (status, body) = post(
            ports,
            "/api/auth/admin/login",
            json!({"username": "admin", "password": "admin123"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_type"], "admin");
    }

    #[actix_web::test]
    async fn admin_login_rejects_blank_password_before_calling_service() {
        let mut ports = TestPorts::default();
        ports.login.expect_admin_login().never();
        let (status, body) = post(
            ports,
            "/api/auth/admin/login",
            json!({"username": "admin", "password": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["context"]["field"], "password");
    }
}

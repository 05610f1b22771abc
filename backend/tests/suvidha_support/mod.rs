//! Shared harness for end-to-end HTTP tests over the in-process store.
//!
//! Each test builds a fresh [`InMemoryStore`], bootstraps the administrator
//! account and drives the real route table through `actix_web::test`.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use suvidha::Trace;
use suvidha::composition::{ServiceAdapters, TokenVerification, build_http_state};
use suvidha::domain::ports::PasswordHasher;
use suvidha::domain::{
    AdminCredentials, LoginPolicy, RandomReferenceCodes, ensure_bootstrap_admin,
};
use suvidha::inbound::http::routes::configure_api;
use suvidha::outbound::auth::{BcryptPasswordHasher, FIXED_OTP, FixedOtpSender, JwtTokenCodec};
use suvidha::outbound::memory::InMemoryStore;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Build the application over a fresh store with a bootstrapped admin.
pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let store = InMemoryStore::new();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::with_cost(4));
    let credentials =
        AdminCredentials::try_from_parts(ADMIN_USERNAME, ADMIN_PASSWORD).expect("valid admin");
    ensure_bootstrap_admin(&store, &password_hasher, &clock, &credentials)
        .await
        .expect("bootstrap admin");

    let state = build_http_state(
        &store,
        ServiceAdapters {
            clock: Arc::clone(&clock),
            codes: Arc::new(RandomReferenceCodes),
            token_codec: Arc::new(JwtTokenCodec::new(b"integration-secret")),
            otp_sender: Arc::new(FixedOtpSender),
            password_hasher,
            policy: LoginPolicy::default(),
        },
        TokenVerification::SelfIssued,
    );
    let clock_data: web::Data<dyn Clock> = web::Data::from(clock);
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(clock_data)
            .wrap(Trace)
            .configure(configure_api),
    )
    .await
}

/// Send `req` and decode the JSON body (`Value::Null` when empty).
pub async fn send<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}

/// Send `req` with a bearer token.
pub async fn send_as<S>(app: &S, token: &str, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        req.insert_header(("Authorization", format!("Bearer {token}"))),
    )
    .await
}

/// Log a citizen in by OTP. Returns `(token, citizen_id)`.
pub async fn citizen_login<S>(app: &S, mobile: &str, name: Option<&str>) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/send-otp")
            .set_json(json!({ "mobile": mobile })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "send-otp");

    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/verify-otp")
            .set_json(json!({ "mobile": mobile, "otp": FIXED_OTP, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify-otp: {body}");
    (
        body["access_token"].as_str().expect("token").to_owned(),
        body["user_id"].as_str().expect("user id").to_owned(),
    )
}

/// Log the bootstrapped administrator in.
pub async fn admin_login<S>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/admin/login")
            .set_json(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login: {body}");
    body["access_token"].as_str().expect("token").to_owned()
}

/// Raise a bill as `admin_token` and return its id.
pub async fn create_bill<S>(
    app: &S,
    admin_token: &str,
    citizen_id: &str,
    amount: f64,
    due_date: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send_as(
        app,
        admin_token,
        TestRequest::post().uri("/api/admin/bills").set_json(json!({
            "citizen_id": citizen_id,
            "service_type": "electricity",
            "amount": amount,
            "due_date": due_date,
            "billing_period": "Jan 2025",
            "consumer_number": "EL-1001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create bill: {body}");
    body["bill_id"].as_str().expect("bill id").to_owned()
}

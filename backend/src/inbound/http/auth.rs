//! Bearer-token session extractors.
//!
//! Handlers take [`CitizenSession`] or [`AdminSession`] as arguments; the
//! extractor reads `Authorization: Bearer <token>`, resolves it through the
//! configured [`crate::domain::ports::AuthGate`] and enforces the role. A
//! missing or malformed header is `401`, a valid token with the wrong role is
//! `403`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::ports::require_role;
use crate::domain::{AdminId, BearerToken, CitizenId, Error, Principal, Role};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Not authenticated"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid authorization header"))?;
    let raw = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or_else(|| Error::unauthorized("Invalid authorization header"))?;
    BearerToken::parse(raw).map_err(|_| Error::unauthorized("Not authenticated"))
}

fn resolve(req: &HttpRequest, role: Role) -> LocalBoxFuture<'static, Result<Principal, Error>> {
    let token = bearer_token(req);
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    Box::pin(async move {
        let token = token?;
        let state = state.ok_or_else(|| {
            error!("HttpState missing from application data");
            Error::internal("authentication is not configured")
        })?;
        require_role(state.auth.as_ref(), &token, role).await
    })
}

/// Authenticated citizen making the request.
#[derive(Debug, Clone, Copy)]
pub struct CitizenSession {
    principal: Principal,
    citizen_id: CitizenId,
}

impl CitizenSession {
    /// The caller's citizen account.
    #[must_use]
    pub const fn citizen_id(&self) -> CitizenId {
        self.citizen_id
    }

    /// The caller as a principal, for ownership checks.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl FromRequest for CitizenSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = resolve(req, Role::Citizen);
        Box::pin(async move {
            let principal = principal.await?;
            let citizen_id = principal
                .citizen_id()
                .ok_or_else(|| Error::forbidden("Citizen access required"))?;
            Ok(Self {
                principal,
                citizen_id,
            })
        })
    }
}

/// Authenticated administrator making the request.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    principal: Principal,
}

impl AdminSession {
    /// The administrator's account id.
    #[must_use]
    pub const fn admin_id(&self) -> AdminId {
        AdminId::from_uuid(self.principal.subject_id())
    }

    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = resolve(req, Role::Admin);
        Box::pin(async move {
            Ok(Self {
                principal: principal.await?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestPorts, gate_resolving};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, get, test};
    use rstest::rstest;

    #[get("/citizen")]
    async fn citizen_only(session: CitizenSession) -> HttpResponse {
        HttpResponse::Ok().body(session.citizen_id().to_string())
    }

    #[get("/admin")]
    async fn admin_only(session: AdminSession) -> HttpResponse {
        HttpResponse::Ok().body(session.admin_id().to_string())
    }

    async fn call(principal: Principal, uri: &str, header: Option<&str>) -> StatusCode {
        let mut ports = TestPorts::default();
        ports.auth = gate_resolving(principal);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .service(citizen_only)
                .service(admin_only),
        )
        .await;
        let mut req = test::TestRequest::get().uri(uri);
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        test::call_service(&app, req.to_request()).await.status()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer    "))]
    #[actix_web::test]
    async fn missing_or_malformed_credentials_are_unauthorized(#[case] header: Option<&str>) {
        let principal = Principal::citizen(CitizenId::random());
        assert_eq!(
            call(principal, "/citizen", header).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[rstest]
    #[case(Role::Citizen, "/citizen", StatusCode::OK)]
    #[case(Role::Citizen, "/admin", StatusCode::FORBIDDEN)]
    #[case(Role::Admin, "/admin", StatusCode::OK)]
    #[case(Role::Admin, "/citizen", StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn roles_gate_each_extractor(
        #[case] role: Role,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let principal = Principal::new(uuid::Uuid::new_v4(), role);
        assert_eq!(
            call(principal, uri, Some("Bearer opaque")).await,
            expected
        );
    }
}

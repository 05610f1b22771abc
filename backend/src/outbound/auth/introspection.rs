//! RFC 7662 token introspection for the delegated identity strategy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::ports::{ExternalIdentity, IdentityProvider, IdentityProviderError};

/// Client credentials presented to the introspection endpoint.
pub struct IntrospectionClient {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

/// Introspection response fields this service reads.
#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl IntrospectionResponse {
    fn into_identity(self) -> Result<ExternalIdentity, IdentityProviderError> {
        if !self.active {
            return Err(IdentityProviderError::rejected("token inactive"));
        }
        let subject = self
            .sub
            .filter(|sub| !sub.trim().is_empty())
            .ok_or_else(|| IdentityProviderError::invalid_response("active token without sub"))?;
        Ok(ExternalIdentity {
            subject,
            phone_number: self.phone_number,
            name: self.name,
        })
    }
}

/// Verifies opaque tokens by POSTing them to an introspection endpoint.
pub struct IntrospectionIdentityProvider {
    client: Client,
    endpoint: Url,
    credentials: IntrospectionClient,
}

impl IntrospectionIdentityProvider {
    /// Build a provider with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: IntrospectionClient,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

fn transport_error(err: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::connection(err.to_string())
}

#[async_trait]
impl IdentityProvider for IntrospectionIdentityProvider {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(
                &self.credentials.client_id,
                Some(self.credentials.client_secret.as_str()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("token", token), ("token_type_hint", "access_token")])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(IdentityProviderError::connection(format!(
                "introspection endpoint answered {status}"
            )));
        }
        let decoded: IntrospectionResponse = serde_json::from_slice(&body).map_err(|err| {
            IdentityProviderError::invalid_response(format!("invalid introspection JSON: {err}"))
        })?;
        decoded.into_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(json: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        serde_json::from_str::<IntrospectionResponse>(json)
            .expect("valid JSON")
            .into_identity()
    }

    #[rstest]
    fn active_tokens_yield_the_subject() {
        let identity = parse(r#"{"active":true,"sub":"idp|7","phone_number":"+919876543210"}"#)
            .expect("active");
        assert_eq!(identity.subject, "idp|7");
        assert_eq!(identity.phone_number.as_deref(), Some("+919876543210"));
        assert_eq!(identity.name, None);
    }

    #[rstest]
    fn inactive_tokens_are_rejected() {
        let err = parse(r#"{"active":false}"#).expect_err("inactive");
        assert!(matches!(err, IdentityProviderError::Rejected { .. }));
    }

    #[rstest]
    #[case(r#"{"active":true}"#)]
    #[case(r#"{"active":true,"sub":"  "}"#)]
    fn active_tokens_need_a_subject(#[case] json: &str) {
        let err = parse(json).expect_err("no subject");
        assert!(matches!(err, IdentityProviderError::InvalidResponse { .. }));
    }
}

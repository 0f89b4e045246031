// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token validation against the external identity service.
//!
//! The service answers `GET <validation-url>` carrying the caller's bearer
//! token with a JSON body holding the phone number of the token's owner.
//! Anything else (non-2xx, transport error, timeout, missing field) is a
//! validation failure. There are no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::ValidatorConfig;
use crate::models::PhoneNumber;

/// Why a bearer token could not be resolved to a phone number.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("validation request failed: {0}")]
    Transport(String),

    #[error("validation endpoint returned {0}")]
    Rejected(u16),

    #[error("validation response was invalid: {0}")]
    InvalidResponse(String),

    #[error("validation response has no phone number")]
    MissingIdentity,
}

/// Resolves a bearer token to the identity it belongs to.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<PhoneNumber, ValidationError>;
}

/// [`TokenValidator`] backed by the HTTP validation endpoint.
#[derive(Debug, Clone)]
pub struct HttpTokenValidator {
    url: Url,
    phone_field: String,
    http: Client,
}

impl HttpTokenValidator {
    pub fn new(config: &ValidatorConfig, timeout: Duration) -> Result<Self, ValidationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ValidationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: config.url.clone(),
            phone_field: config.phone_field.clone(),
            http,
        })
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, token: &str) -> Result<PhoneNumber, ValidationError> {
        let response = self
            .http
            .get(self.url.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ValidationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ValidationError::Rejected(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ValidationError::InvalidResponse(e.to_string()))?;

        extract_phone(&body, &self.phone_field).ok_or(ValidationError::MissingIdentity)
    }
}

/// Read the phone number from a validation response body.
///
/// Numbers are accepted as well as strings; some deployments return the
/// phone number as a JSON number.
fn extract_phone(body: &Value, field: &str) -> Option<PhoneNumber> {
    match body.get(field)? {
        Value::String(s) => PhoneNumber::parse(s),
        Value::Number(n) => PhoneNumber::parse(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_validator() -> Url {
        async fn validate(headers: HeaderMap) -> Result<Json<Value>, axum::http::StatusCode> {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            match auth {
                "Bearer good" => Ok(Json(json!({ "phoneNumber": "0911111111" }))),
                "Bearer numeric" => Ok(Json(json!({ "phoneNumber": 911111111 }))),
                "Bearer empty" => Ok(Json(json!({ "phoneNumber": "" }))),
                "Bearer other" => Ok(Json(json!({ "userId": "u1" }))),
                _ => Err(axum::http::StatusCode::UNAUTHORIZED),
            }
        }

        let app = Router::new().route("/api/Authenticate/Validate", get(validate));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/Authenticate/Validate")).unwrap()
    }

    fn validator(url: Url) -> HttpTokenValidator {
        HttpTokenValidator::new(
            &ValidatorConfig {
                url,
                phone_field: "phoneNumber".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepted_token_resolves_phone() {
        let validator = validator(spawn_validator().await);
        let phone = validator.validate("good").await.unwrap();
        assert_eq!(phone.as_str(), "0911111111");
    }

    #[tokio::test]
    async fn numeric_phone_is_accepted() {
        let validator = validator(spawn_validator().await);
        let phone = validator.validate("numeric").await.unwrap();
        assert_eq!(phone.as_str(), "911111111");
    }

    #[tokio::test]
    async fn rejected_token_reports_status() {
        let validator = validator(spawn_validator().await);
        let err = validator.validate("bad").await.unwrap_err();
        assert!(matches!(err, ValidationError::Rejected(401)));
    }

    #[tokio::test]
    async fn missing_or_empty_phone_is_a_failure() {
        let validator = validator(spawn_validator().await);
        assert!(matches!(
            validator.validate("other").await,
            Err(ValidationError::MissingIdentity)
        ));
        assert!(matches!(
            validator.validate("empty").await,
            Err(ValidationError::MissingIdentity)
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let validator = validator(Url::parse(&format!("http://{addr}/validate")).unwrap());
        assert!(matches!(
            validator.validate("good").await,
            Err(ValidationError::Transport(_))
        ));
    }

    #[test]
    fn extract_phone_ignores_other_types() {
        assert!(extract_phone(&json!({ "phoneNumber": null }), "phoneNumber").is_none());
        assert!(extract_phone(&json!({ "phoneNumber": ["x"] }), "phoneNumber").is_none());
        assert_eq!(
            extract_phone(&json!({ "msisdn": "0922" }), "msisdn")
                .unwrap()
                .as_str(),
            "0922"
        );
    }
}

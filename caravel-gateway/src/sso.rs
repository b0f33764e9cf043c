use crate::http::{execute, parse_json, string_field};
use caravel_core::model::{ShopperId, SsoToken};
use caravel_core::{CallError, CallResult, Sensitive};
use serde::Serialize;

/// Response fields the token is accepted from, in priority order.
///
/// `jwtToken` is the authoritative field; older SSO deployments answer with
/// the token under `data` instead. The divergence is an external
/// compatibility risk, not a contract this tool owns, so the fallback is
/// only consulted when the primary field is absent.
pub const TOKEN_FIELDS: [&str; 2] = ["jwtToken", "data"];

/// Client for the SSO (authentication) service.
pub struct SsoClient {
    http: reqwest::Client,
    base: String,
}

impl SsoClient {
    pub fn new(http: reqwest::Client, base: String) -> Self {
        Self { http, base }
    }

    /// `POST /token` — exchange shopper credentials for a bearer token.
    pub async fn issue_token(
        &self,
        shopper: &ShopperId,
        password: &Sensitive<String>,
    ) -> CallResult<SsoToken> {
        let url = format!("{}/token", self.base);
        let body = execute(self.http.post(&url).json(&TokenRequest {
            username: shopper.as_str(),
            password,
        }))
        .await?;

        parse_token(&body)
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a Sensitive<String>,
}

/// Pull the token out of a response, trying the accepted fields in order.
pub fn parse_token(body: &str) -> CallResult<SsoToken> {
    let value = parse_json(body)?;
    for field in TOKEN_FIELDS {
        if let Some(token) = string_field(&value, field) {
            return Ok(SsoToken::new(token));
        }
    }

    Err(CallError::decode("no token field in response", body))
}

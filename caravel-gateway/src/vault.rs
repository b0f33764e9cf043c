use crate::http::{execute, parse_json, string_field};
use caravel_core::model::EncryptedCard;
use caravel_core::{CallError, CallResult, Sensitive};
use serde::Serialize;

/// Client for the local card-encryption helper.
///
/// The helper is a sidecar on the operator's machine: the raw card number
/// travels to it over loopback and nowhere else.
pub struct VaultClient {
    http: reqwest::Client,
    base: String,
    env_tag: String,
}

impl VaultClient {
    pub fn new(http: reqwest::Client, base: String, env_tag: String) -> Self {
        Self {
            http,
            base,
            env_tag,
        }
    }

    /// `POST /encrypt` — tokenize a raw card number.
    pub async fn encrypt(&self, pan: &Sensitive<String>) -> CallResult<EncryptedCard> {
        let url = format!("{}/encrypt", self.base);
        let body = execute(self.http.post(&url).json(&EncryptRequest {
            env: &self.env_tag,
            card_number: pan,
        }))
        .await?;

        parse_encrypted(&body)
    }
}

#[derive(Serialize)]
struct EncryptRequest<'a> {
    env: &'a str,
    #[serde(rename = "cardNumber")]
    card_number: &'a Sensitive<String>,
}

pub fn parse_encrypted(body: &str) -> CallResult<EncryptedCard> {
    let value = parse_json(body)?;
    string_field(&value, "cardEncrypted")
        .map(EncryptedCard)
        .ok_or_else(|| CallError::decode("cardEncrypted missing from response", body))
}

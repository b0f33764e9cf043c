use crate::http::{execute, parse_json, sso_auth, string_field};
use caravel_core::model::{ContactProfile, ShopperId, SsoToken};
use caravel_core::{CallError, CallResult, RunConfig, Sensitive};
use serde::Serialize;

/// Client for the shopper (identity) service.
pub struct ShopperClient {
    http: reqwest::Client,
    base: String,
    audit_client_ip: String,
}

impl ShopperClient {
    pub fn new(http: reqwest::Client, base: String, audit_client_ip: String) -> Self {
        Self {
            http,
            base,
            audit_client_ip,
        }
    }

    /// `POST /shoppers` — create a new shopper account.
    pub async fn create(&self, request: &NewShopperRequest) -> CallResult<ShopperId> {
        let url = format!("{}/shoppers", self.base);
        let body = execute(
            self.http
                .post(&url)
                .query(&[("auditClientIp", self.audit_client_ip.as_str())])
                .json(request),
        )
        .await?;

        parse_shopper_id(&body)
    }

    /// `PATCH /shoppers/{id}` — apply the contact profile.
    pub async fn patch_contact(
        &self,
        shopper: &ShopperId,
        token: &SsoToken,
        contact: &ContactProfile,
    ) -> CallResult<()> {
        let url = format!("{}/shoppers/{}", self.base, shopper);
        execute(
            self.http
                .patch(&url)
                .query(&[("auditClientIp", self.audit_client_ip.as_str())])
                .header(reqwest::header::AUTHORIZATION, sso_auth(token))
                .json(&ContactPatch { contact }),
        )
        .await?;

        Ok(())
    }
}

/// Body of the shopper-creation call. The contact block is a placeholder;
/// the real profile is patched on in a later stage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShopperRequest {
    pub private_label_id: u32,
    pub login_name: String,
    pub email: String,
    pub auth: AuthBlock,
    pub contact: PlaceholderContact,
    pub preference: PreferenceBlock,
}

impl NewShopperRequest {
    pub fn from_defaults(config: &RunConfig, login_name: &str, email: &str) -> Self {
        Self {
            private_label_id: 1,
            login_name: login_name.to_string(),
            email: email.to_string(),
            auth: AuthBlock {
                password: config.auth.password.clone(),
                pin: config.auth.pin.clone(),
            },
            contact: PlaceholderContact::default(),
            preference: PreferenceBlock::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthBlock {
    pub password: Sensitive<String>,
    pub pin: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderContact {
    pub name_first: &'static str,
    pub name_last: &'static str,
    pub organization: &'static str,
    // The creation API wants an empty string here, not an address object.
    pub address: &'static str,
    pub phone_work: &'static str,
    pub phone_work_extension: &'static str,
    pub phone_home: &'static str,
    pub phone_mobile: &'static str,
    pub fax: &'static str,
}

impl Default for PlaceholderContact {
    fn default() -> Self {
        Self {
            name_first: "Caravel",
            name_last: "Automation",
            organization: "qa",
            address: "",
            phone_work: "",
            phone_work_extension: "",
            phone_home: "",
            phone_mobile: "",
            fax: "",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceBlock {
    pub currency: &'static str,
    pub market_id: &'static str,
    pub email_format: &'static str,
    pub allowed_communication_types: Vec<String>,
}

impl Default for PreferenceBlock {
    fn default() -> Self {
        Self {
            currency: "USD",
            market_id: "en-US",
            email_format: "",
            allowed_communication_types: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct ContactPatch<'a> {
    contact: &'a ContactProfile,
}

/// Extract the shopper identifier from a creation response, accepting the
/// string and numeric spellings seen across deployments.
pub fn parse_shopper_id(body: &str) -> CallResult<ShopperId> {
    let value = parse_json(body)?;
    string_field(&value, "shopperId")
        .map(ShopperId::new)
        .ok_or_else(|| CallError::decode("shopperId missing from response", body))
}

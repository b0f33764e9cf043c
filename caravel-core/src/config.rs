use crate::model::{BillingContact, ContactProfile};
use crate::pii::Sensitive;
use serde::Deserialize;

/// Immutable configuration for one run.
///
/// Built once at startup and passed by reference into every stage. Layering
/// follows the usual order: built-in defaults, then an optional
/// `config/caravel.toml`, then `CARAVEL`-prefixed environment variables with
/// `__` as the section separator (e.g. `CARAVEL__BASKET__PRODUCT_ID=12345`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub environment: EnvironmentSettings,
    pub endpoints: EndpointTemplates,
    pub auth: AuthDefaults,
    pub contact: ContactProfile,
    pub card: CardSettings,
    pub billing: BillingContact,
    pub encryption: EncryptionSettings,
    pub basket: BasketSettings,
    pub purchase: PurchaseSettings,
    pub pipeline: PipelinePolicy,
}

impl RunConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("config/caravel").required(false))
            .add_source(config::Environment::with_prefix("CARAVEL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Label used when the operator does not name an environment.
    pub default_label: String,
    /// Value of the `auditClientIp` query parameter on mutating shopper calls.
    pub audit_client_ip: String,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            default_label: "test".into(),
            audit_client_ip: "localhost".into(),
        }
    }
}

/// Per-service base-address templates. `{env}` is replaced with the
/// environment label at resolution time; the encryption helper is a local
/// sidecar and carries no placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointTemplates {
    pub shopper: String,
    pub sso: String,
    pub payment: String,
    pub basket: String,
    pub encrypt: String,
}

impl Default for EndpointTemplates {
    fn default() -> Self {
        Self {
            shopper: "https://shopper.api.{env}.caravel.cloud/v1".into(),
            sso: "https://sso.{env}.caravel.cloud/v1/api".into(),
            payment: "https://payment.api.{env}.caravel.cloud/v1".into(),
            basket: "https://basket.{env}.caravel.cloud/legacy/BasketService.dll".into(),
            encrypt: "http://127.0.0.1:3001/api".into(),
        }
    }
}

/// Shared QA credentials used for new shoppers and token issuance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthDefaults {
    pub password: Sensitive<String>,
    pub pin: String,
}

impl Default for AuthDefaults {
    fn default() -> Self {
        Self {
            password: Sensitive::new("qaAutomation#7".into()),
            pin: "1024".into(),
        }
    }
}

/// Default card details plus the billing country and currency they are
/// registered under. All four override together in interactive runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    pub pan: Sensitive<String>,
    pub network: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvv: String,
    pub name_on_card: String,
    pub billing_country: String,
    pub currency: String,
}

impl CardSettings {
    /// Last four digits, safe to echo in prompts and logs.
    pub fn pan_last4(&self) -> String {
        let pan = self.pan.reveal();
        let tail: String = pan
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("…{tail}")
    }
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            pan: Sensitive::new("4111111111111111".into()),
            network: "Visa".into(),
            exp_month: 12,
            exp_year: 2029,
            cvv: "737".into(),
            name_on_card: "Avery Quinn".into(),
            billing_country: "US".into(),
            currency: "USD".into(),
        }
    }
}

/// Settings for the local card-encryption helper.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionSettings {
    /// Environment tag the helper expects in its request body. Fixed,
    /// independent of the target environment label.
    pub env_tag: String,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self {
            env_tag: "test".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BasketSettings {
    pub country: String,
    pub currency: String,
    pub product_id: String,
    /// Tracking code stamped on basket line items.
    pub tracking_code: String,
    /// Skip certificate verification towards the basket endpoint. The legacy
    /// basket deployments in test environments present self-signed
    /// certificates; this is an environment-scoped trust override, never a
    /// client-wide default.
    pub accept_invalid_certs: bool,
}

impl Default for BasketSettings {
    fn default() -> Self {
        Self {
            country: "US".into(),
            currency: "USD".into(),
            product_id: "8007".into(),
            tracking_code: "caravel".into(),
            accept_invalid_certs: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PurchaseSettings {
    /// Seller-config reference the settlement is keyed to.
    pub seller_config_uri: String,
    /// Market identifier sent in the `X-Market-Id` header.
    pub market_id: String,
}

impl Default for PurchaseSettings {
    fn default() -> Self {
        Self {
            seller_config_uri:
                "/v1/8a1f6c3e-2d4b-4e8a-9c7f-5b2e8d1a4f6c/seller-configs/3e9d7b5a-1c8f-4a2e-b6d4-9f0c2a7e5d1b"
                    .into(),
            market_id: "en-us".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelinePolicy {
    /// Whether a basket failure (transport error or reported non-success)
    /// aborts the run before settlement. The historical behaviour is to
    /// continue, since seller-config purchases do not require a populated
    /// basket.
    pub abort_on_basket_failure: bool,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            abort_on_basket_failure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_carry_placeholder() {
        let templates = EndpointTemplates::default();
        for template in [&templates.shopper, &templates.sso, &templates.payment, &templates.basket]
        {
            assert!(template.contains("{env}"), "missing placeholder: {template}");
        }
        // The encryption helper is local and not environment-scoped.
        assert!(!templates.encrypt.contains("{env}"));
    }

    #[test]
    fn test_defaults_are_complete() {
        let config = RunConfig::default();
        assert!(!config.card.pan.reveal().is_empty());
        assert!(!config.auth.password.reveal().is_empty());
        assert!(!config.basket.product_id.is_empty());
        assert!(config.purchase.seller_config_uri.starts_with("/v1/"));
        assert!(!config.pipeline.abort_on_basket_failure);
    }

    #[test]
    fn test_pan_last4() {
        let card = CardSettings::default();
        assert_eq!(card.pan_last4(), "…1111");
    }
}

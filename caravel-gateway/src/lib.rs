pub mod basket;
pub mod envelope;
mod http;
pub mod payment;
pub mod shopper;
pub mod sso;
pub mod vault;

use async_trait::async_trait;
use caravel_core::model::{
    BasketOutcome, EncryptedCard, OrderId, PaymentProfileId, ShopperId, SsoToken,
};
use caravel_core::{CallResult, Endpoints, RunConfig, Sensitive, Storefront};

use basket::BasketClient;
use payment::{PaymentClient, PaymentProfileRequest, PurchaseRequest};
use shopper::{NewShopperRequest, ShopperClient};
use sso::SsoClient;
use vault::VaultClient;

/// HTTP implementation of the storefront operations against one resolved
/// environment.
pub struct HttpStorefront {
    config: RunConfig,
    shopper: ShopperClient,
    sso: SsoClient,
    vault: VaultClient,
    payment: PaymentClient,
    basket: BasketClient,
}

impl HttpStorefront {
    /// Build the per-service clients for the given endpoint set.
    ///
    /// The basket service gets a client of its own because it is the only
    /// endpoint where the configured certificate-trust override may apply.
    pub fn connect(config: RunConfig, endpoints: &Endpoints) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        let basket_http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.basket.accept_invalid_certs)
            .build()?;

        if config.basket.accept_invalid_certs {
            tracing::warn!(
                endpoint = %endpoints.basket,
                "certificate verification disabled for the basket endpoint"
            );
        }

        Ok(Self {
            shopper: ShopperClient::new(
                http.clone(),
                endpoints.shopper.clone(),
                config.environment.audit_client_ip.clone(),
            ),
            sso: SsoClient::new(http.clone(), endpoints.sso.clone()),
            vault: VaultClient::new(
                http.clone(),
                endpoints.encrypt.clone(),
                config.encryption.env_tag.clone(),
            ),
            payment: PaymentClient::new(
                http,
                endpoints.payment.clone(),
                config.purchase.market_id.clone(),
            ),
            basket: BasketClient::new(
                basket_http,
                endpoints.basket.clone(),
                config.basket.tracking_code.clone(),
            ),
            config,
        })
    }
}

#[async_trait]
impl Storefront for HttpStorefront {
    async fn create_shopper(&self, login_name: &str, email: &str) -> CallResult<ShopperId> {
        tracing::debug!(login_name, email, "creating shopper");
        let request = NewShopperRequest::from_defaults(&self.config, login_name, email);
        self.shopper.create(&request).await
    }

    async fn issue_token(&self, shopper: &ShopperId) -> CallResult<SsoToken> {
        tracing::debug!(%shopper, "requesting token");
        self.sso
            .issue_token(shopper, &self.config.auth.password)
            .await
    }

    async fn patch_contact(&self, shopper: &ShopperId, token: &SsoToken) -> CallResult<()> {
        tracing::debug!(%shopper, "patching contact profile");
        self.shopper
            .patch_contact(shopper, token, &self.config.contact)
            .await
    }

    async fn encrypt_card(&self, pan: &Sensitive<String>) -> CallResult<EncryptedCard> {
        tracing::debug!("encrypting card number");
        self.vault.encrypt(pan).await
    }

    async fn register_payment_method(
        &self,
        shopper: &ShopperId,
        token: &SsoToken,
        card_number: &EncryptedCard,
        card_type: &str,
        billing_country: &str,
        currency: &str,
    ) -> CallResult<PaymentProfileId> {
        tracing::debug!(%shopper, card_type, billing_country, currency, "registering payment method");
        let request = PaymentProfileRequest::build(
            &self.config,
            card_number,
            card_type,
            billing_country,
            currency,
        );
        self.payment.create_profile(token, &request).await
    }

    async fn add_item(
        &self,
        shopper: &ShopperId,
        country_code: &str,
        currency: &str,
        product_id: &str,
    ) -> CallResult<BasketOutcome> {
        tracing::debug!(%shopper, country_code, currency, product_id, "adding basket item");
        self.basket
            .add_item(shopper, country_code, currency, product_id)
            .await
    }

    async fn settle_purchase(
        &self,
        shopper: &ShopperId,
        token: &SsoToken,
        payment_profile: &PaymentProfileId,
        cvv: &str,
        seller_config_uri: &str,
    ) -> CallResult<OrderId> {
        tracing::debug!(%shopper, %payment_profile, seller_config_uri, "settling purchase");
        let request = PurchaseRequest::build(payment_profile, cvv, seller_config_uri)?;
        self.payment.purchase(token, &request).await
    }
}

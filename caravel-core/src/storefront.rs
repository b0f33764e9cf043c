use crate::error::CallResult;
use crate::model::{
    BasketOutcome, EncryptedCard, OrderId, PaymentProfileId, ShopperId, SsoToken,
};
use crate::pii::Sensitive;
use async_trait::async_trait;

/// The remote operations the purchase pipeline is built from, one method per
/// stage. Implemented over HTTP by `caravel-gateway`; driver tests use a
/// scripted implementation instead.
///
/// Fatality is not encoded here: a method only reports what happened, the
/// driver decides whether the run continues.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Create a new shopper with the generated login and email.
    async fn create_shopper(&self, login_name: &str, email: &str) -> CallResult<ShopperId>;

    /// Exchange the shopper id and shared password for a bearer token.
    async fn issue_token(&self, shopper: &ShopperId) -> CallResult<SsoToken>;

    /// Apply the default contact profile to the shopper.
    async fn patch_contact(&self, shopper: &ShopperId, token: &SsoToken) -> CallResult<()>;

    /// Tokenize a raw card number through the local encryption helper.
    async fn encrypt_card(&self, pan: &Sensitive<String>) -> CallResult<EncryptedCard>;

    /// Register a stored payment method carrying the encrypted card number.
    async fn register_payment_method(
        &self,
        shopper: &ShopperId,
        token: &SsoToken,
        card_number: &EncryptedCard,
        card_type: &str,
        billing_country: &str,
        currency: &str,
    ) -> CallResult<PaymentProfileId>;

    /// Add one line item to the shopper's basket and interpret the envelope.
    async fn add_item(
        &self,
        shopper: &ShopperId,
        country_code: &str,
        currency: &str,
        product_id: &str,
    ) -> CallResult<BasketOutcome>;

    /// Execute the purchase against the stored payment method.
    async fn settle_purchase(
        &self,
        shopper: &ShopperId,
        token: &SsoToken,
        payment_profile: &PaymentProfileId,
        cvv: &str,
        seller_config_uri: &str,
    ) -> CallResult<OrderId>;
}

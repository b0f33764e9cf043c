use async_trait::async_trait;
use caravel_core::model::{
    BasketOutcome, EncryptedCard, OrderId, PaymentProfileId, ShopperId, SsoToken,
};
use caravel_core::{CallError, CallResult, Sensitive, Storefront};
use std::sync::Mutex;

/// Scripted in-memory storefront for driver tests.
///
/// Records every operation in invocation order and can be told to fail one
/// operation with a given HTTP status, or to answer the basket stage with a
/// chosen outcome.
pub struct ScriptedStorefront {
    fail: Option<(&'static str, u16)>,
    basket_outcome: BasketOutcome,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedStorefront {
    pub fn happy() -> Self {
        Self {
            fail: None,
            basket_outcome: BasketOutcome::Success,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail the named operation with an HTTP status error.
    pub fn failing_at(operation: &'static str, status: u16) -> Self {
        Self {
            fail: Some((operation, status)),
            ..Self::happy()
        }
    }

    /// Answer the basket stage with the given outcome.
    pub fn with_basket(outcome: BasketOutcome) -> Self {
        Self {
            basket_outcome: outcome,
            ..Self::happy()
        }
    }

    /// Operations invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record(&self, operation: &'static str) -> CallResult<()> {
        self.calls.lock().expect("call log poisoned").push(operation);
        match self.fail {
            Some((failing, status)) if failing == operation => Err(CallError::HttpStatus {
                status,
                body: format!("scripted {status} for {operation}"),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Storefront for ScriptedStorefront {
    async fn create_shopper(&self, _login_name: &str, _email: &str) -> CallResult<ShopperId> {
        self.record("create_shopper")?;
        Ok(ShopperId::new("900001"))
    }

    async fn issue_token(&self, _shopper: &ShopperId) -> CallResult<SsoToken> {
        self.record("issue_token")?;
        Ok(SsoToken::new("scripted-token"))
    }

    async fn patch_contact(&self, _shopper: &ShopperId, _token: &SsoToken) -> CallResult<()> {
        self.record("patch_contact")
    }

    async fn encrypt_card(&self, _pan: &Sensitive<String>) -> CallResult<EncryptedCard> {
        self.record("encrypt_card")?;
        Ok(EncryptedCard("enc_scripted".into()))
    }

    async fn register_payment_method(
        &self,
        _shopper: &ShopperId,
        _token: &SsoToken,
        _card_number: &EncryptedCard,
        _card_type: &str,
        _billing_country: &str,
        _currency: &str,
    ) -> CallResult<PaymentProfileId> {
        self.record("register_payment_method")?;
        Ok(PaymentProfileId("424242".into()))
    }

    async fn add_item(
        &self,
        _shopper: &ShopperId,
        _country_code: &str,
        _currency: &str,
        _product_id: &str,
    ) -> CallResult<BasketOutcome> {
        self.record("add_item")?;
        Ok(self.basket_outcome.clone())
    }

    async fn settle_purchase(
        &self,
        _shopper: &ShopperId,
        _token: &SsoToken,
        _payment_profile: &PaymentProfileId,
        _cvv: &str,
        _seller_config_uri: &str,
    ) -> CallResult<OrderId> {
        self.record("settle_purchase")?;
        Ok(OrderId("ORD-1".into()))
    }
}

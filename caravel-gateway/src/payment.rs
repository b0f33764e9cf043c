use crate::http::{execute, parse_json, sso_auth, string_field};
use caravel_core::model::{BillingContact, EncryptedCard, OrderId, PaymentProfileId, SsoToken};
use caravel_core::{CallError, CallResult, RunConfig};
use serde::Serialize;
use uuid::Uuid;

/// Client for the payment service (profile registration and settlement).
pub struct PaymentClient {
    http: reqwest::Client,
    base: String,
    market_id: String,
}

impl PaymentClient {
    pub fn new(http: reqwest::Client, base: String, market_id: String) -> Self {
        Self {
            http,
            base,
            market_id,
        }
    }

    /// `POST /paymentprofiles` — register a stored payment method.
    ///
    /// Both identifiers are freshly generated per call so the service can
    /// discard duplicate submissions without ever pairing two logical
    /// registrations under one idempotency id.
    pub async fn create_profile(
        &self,
        token: &SsoToken,
        request: &PaymentProfileRequest,
    ) -> CallResult<PaymentProfileId> {
        let ids = RequestIds::fresh();
        let url = format!("{}/paymentprofiles", self.base);
        let body = execute(
            self.http
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, sso_auth(token))
                .header("X-Request-Id", &ids.request_id)
                .header("idempotentId", &ids.idempotency_id)
                .json(request),
        )
        .await?;

        parse_profile_id(&body)
    }

    /// `POST /purchase` — settle against a stored payment method.
    pub async fn purchase(
        &self,
        token: &SsoToken,
        request: &PurchaseRequest,
    ) -> CallResult<OrderId> {
        let ids = RequestIds::fresh();
        let url = format!("{}/purchase", self.base);
        let body = execute(
            self.http
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, sso_auth(token))
                .header("X-Request-Id", &ids.request_id)
                .header("X-Market-Id", &self.market_id)
                .json(request),
        )
        .await?;

        parse_order_id(&body)
    }
}

/// Correlation and idempotency identifiers, generated fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIds {
    pub request_id: String,
    pub idempotency_id: String,
}

impl RequestIds {
    pub fn fresh() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            idempotency_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProfileRequest {
    pub credit_card: CreditCardBlock,
    pub status: &'static str,
    pub currency: String,
    pub bill_to: BillingContact,
    pub source: &'static str,
}

impl PaymentProfileRequest {
    /// Assemble the registration body from configured defaults plus the
    /// per-run card parameters. The billing country override lands in the
    /// mailing address of the billTo block.
    pub fn build(
        config: &RunConfig,
        card_number: &EncryptedCard,
        card_type: &str,
        billing_country: &str,
        currency: &str,
    ) -> Self {
        let mut bill_to = config.billing.clone();
        bill_to.contact.address_mailing.country = billing_country.to_string();

        Self {
            credit_card: CreditCardBlock {
                number: card_number.clone(),
                card_type: card_type.to_string(),
                name_on_card: config.card.name_on_card.clone(),
                exp_month: config.card.exp_month,
                exp_year: config.card.exp_year,
                cvv: config.card.cvv.clone(),
            },
            status: "CREATE",
            currency: currency.to_string(),
            bill_to,
            source: "checkout",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardBlock {
    /// Always the encrypted form; the raw number never reaches this service.
    pub number: EncryptedCard,
    #[serde(rename = "type")]
    pub card_type: String,
    pub name_on_card: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvv: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub standard_basket: bool,
    pub payment_details: PaymentDetails,
}

impl PurchaseRequest {
    pub fn build(
        payment_profile: &PaymentProfileId,
        cvv: &str,
        seller_config_uri: &str,
    ) -> CallResult<Self> {
        // The purchase API wants the numeric form of the profile handle.
        let id: i64 = payment_profile.0.parse().map_err(|_| {
            CallError::decode(
                "payment profile id is not numeric",
                payment_profile.0.clone(),
            )
        })?;

        Ok(Self {
            standard_basket: true,
            payment_details: PaymentDetails {
                stored_methods: vec![StoredMethod {
                    id,
                    cvv: cvv.to_string(),
                }],
                seller_config_uri: seller_config_uri.to_string(),
            },
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub stored_methods: Vec<StoredMethod>,
    pub seller_config_uri: String,
}

#[derive(Debug, Serialize)]
pub struct StoredMethod {
    pub id: i64,
    pub cvv: String,
}

pub fn parse_profile_id(body: &str) -> CallResult<PaymentProfileId> {
    let value = parse_json(body)?;
    string_field(&value, "profileID")
        .map(PaymentProfileId)
        .ok_or_else(|| CallError::decode("profileID missing from response", body))
}

pub fn parse_order_id(body: &str) -> CallResult<OrderId> {
    let value = parse_json(body)?;
    string_field(&value, "orderId")
        .map(OrderId)
        .ok_or_else(|| CallError::decode("orderId missing from response", body))
}

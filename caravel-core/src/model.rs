use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the shopper account a run operates on.
///
/// Created by the provisioning stage or supplied by the operator; never
/// mutated for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopperId(pub String);

impl ShopperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential scoped to one shopper, attached to every authenticated
/// call. Lifetime is a single run; it is never refreshed.
#[derive(Clone, PartialEq, Eq)]
pub struct SsoToken(String);

impl SsoToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SsoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a short prefix; enough to correlate, not enough to replay.
        let preview: String = self.0.chars().take(6).collect();
        write!(f, "SsoToken({preview}…)")
    }
}

/// A card number after the local encryption helper has tokenized it.
/// This is the only form in which a card number leaves the process towards
/// the payment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedCard(pub String);

impl fmt::Display for EncryptedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle of a stored payment instrument, as returned by the payment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentProfileId(pub String);

impl fmt::Display for PaymentProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal artifact of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interpreted outcome of the basket add-item call.
///
/// The basket service reports application-level failures inside its response
/// envelope with a 200 status, so transport success and business success are
/// separate questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasketOutcome {
    /// The nested response message equalled "success" (case-insensitive).
    Success,
    /// The service answered with a message other than success.
    Rejected(String),
    /// The envelope could not be interpreted; carries the reason.
    Unreadable(String),
}

impl BasketOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BasketOutcome::Success)
    }
}

impl fmt::Display for BasketOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasketOutcome::Success => f.write_str("success"),
            BasketOutcome::Rejected(msg) => write!(f, "rejected: {msg}"),
            BasketOutcome::Unreadable(reason) => write!(f, "unreadable response: {reason}"),
        }
    }
}

/// Postal address used in shopper contact payloads.
///
/// Deserialized from configuration with snake_case keys and serialized to the
/// wire with the camelCase names the shopper service expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Address {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            address1: "123 Main St".into(),
            address2: "Suite 100".into(),
            city: "Seattle".into(),
            state: "WA".into(),
            postal_code: "98101".into(),
            country: "US".into(),
        }
    }
}

/// Contact profile applied to the shopper by the enrichment stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct ContactProfile {
    pub address: Address,
    pub name_first: String,
    pub name_last: String,
    pub organization: String,
    pub phone_work: String,
    pub phone_work_extension: String,
    pub phone_home: String,
    pub phone_mobile: String,
    pub fax: String,
}

impl Default for ContactProfile {
    fn default() -> Self {
        Self {
            address: Address::default(),
            name_first: "Avery".into(),
            name_last: "Quinn".into(),
            organization: "QA".into(),
            phone_work: "+15555555555".into(),
            phone_work_extension: String::new(),
            phone_home: String::new(),
            phone_mobile: String::new(),
            fax: String::new(),
        }
    }
}

/// Mailing address block inside the billing contact, as the payment service
/// shapes it (a different field set than the shopper-service address).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct MailingAddress {
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub state: String,
    pub address1: String,
    pub address2: String,
}

impl Default for MailingAddress {
    fn default() -> Self {
        Self {
            city: "Seattle".into(),
            country: "US".into(),
            postal_code: "98101".into(),
            state: "WA".into(),
            address1: "123 Main St".into(),
            address2: "Suite 100".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct BillingParty {
    pub name_first: String,
    pub name_last: String,
    pub phone: String,
    pub organization: String,
    pub address_mailing: MailingAddress,
}

impl Default for BillingParty {
    fn default() -> Self {
        Self {
            name_first: "Avery".into(),
            name_last: "Quinn".into(),
            phone: "+15555555555".into(),
            organization: "QA".into(),
            address_mailing: MailingAddress::default(),
        }
    }
}

/// The `billTo` block of a payment-profile registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct BillingContact {
    pub tax_id: String,
    pub contact: BillingParty,
}

impl Default for BillingContact {
    fn default() -> Self {
        Self {
            tax_id: "9876543210".into(),
            contact: BillingParty::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_profile_serializes_camel_case() {
        let contact = ContactProfile::default();
        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("nameFirst").is_some());
        assert!(json.get("phoneWork").is_some());
        assert!(json["address"].get("postalCode").is_some());
    }

    #[test]
    fn test_billing_contact_serializes_camel_case() {
        let billing = BillingContact::default();
        let json = serde_json::to_value(&billing).unwrap();
        assert!(json.get("taxId").is_some());
        assert!(json["contact"].get("addressMailing").is_some());
    }

    #[test]
    fn test_sso_token_debug_is_truncated() {
        let token = SsoToken::new("eyJhbGciOiJIUzI1NiJ9.secret.secret");
        let rendered = format!("{:?}", token);
        assert!(rendered.starts_with("SsoToken(eyJhbG"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_basket_outcome_success_predicate() {
        assert!(BasketOutcome::Success.is_success());
        assert!(!BasketOutcome::Rejected("declined".into()).is_success());
        assert!(!BasketOutcome::Unreadable("no return node".into()).is_success());
    }
}

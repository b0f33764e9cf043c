use crate::params::ParamSource;
use caravel_core::model::{BasketOutcome, OrderId, ShopperId};
use caravel_core::{CallError, RunConfig, Storefront};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Provision,
    Authenticate,
    PatchContact,
    EncryptCard,
    RegisterPayment,
    AddToCart,
    Settle,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Provision => "shopper provisioning",
            Stage::Authenticate => "token issuance",
            Stage::PatchContact => "contact enrichment",
            Stage::EncryptCard => "card encryption",
            Stage::RegisterPayment => "payment registration",
            Stage::AddToCart => "basket add-item",
            Stage::Settle => "purchase settlement",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong in a stage: a classified remote-call failure, or a
/// basket answer treated as failure under the abort policy.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Call(#[from] CallError),
    #[error("basket {0}")]
    Basket(BasketOutcome),
}

impl StageError {
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::Call(err) => err.kind(),
            StageError::Basket(_) => "basket-outcome",
        }
    }
}

/// A failure that moved the pipeline to its aborted state.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub error: StageError,
}

impl StageFailure {
    fn call(stage: Stage, error: CallError) -> Self {
        Self {
            stage,
            error: StageError::Call(error),
        }
    }
}

/// Everything a run produced, whether it completed or aborted. Partial
/// results are kept so the operator can resume by hand.
#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub environment: String,
    pub shopper_id: Option<ShopperId>,
    pub order_id: Option<OrderId>,
    pub basket: Option<BasketOutcome>,
    pub aborted: Option<StageFailure>,
}

impl RunReport {
    fn new(environment: &str) -> Self {
        Self {
            started_at: Utc::now(),
            environment: environment.to_string(),
            shopper_id: None,
            order_id: None,
            basket: None,
            aborted: None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

/// Generate the login name and email for a fresh shopper.
pub fn generated_identity() -> (String, String) {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    (
        format!("qarun{suffix}"),
        format!("caravel.qa+{suffix}@mailinator.com"),
    )
}

/// Drives the stages in order, threading each stage's output into the next.
///
/// Provisioning, token issuance, card encryption and payment registration
/// are fatal: their failure aborts the run. Contact enrichment is always
/// best-effort. The basket stage aborts only under the configured policy,
/// and a settlement failure completes the run without an order.
pub struct PurchaseDriver<'a> {
    config: &'a RunConfig,
    storefront: &'a dyn Storefront,
}

impl<'a> PurchaseDriver<'a> {
    pub fn new(config: &'a RunConfig, storefront: &'a dyn Storefront) -> Self {
        Self { config, storefront }
    }

    pub async fn run(&self, environment: &str, params: &mut dyn ParamSource) -> RunReport {
        let mut report = RunReport::new(environment);

        if let Err(failure) = self.execute(&mut report, params).await {
            tracing::error!(
                stage = %failure.stage,
                kind = failure.error.kind(),
                error = %failure.error,
                "pipeline aborted"
            );
            report.aborted = Some(failure);
        }

        report
    }

    async fn execute(
        &self,
        report: &mut RunReport,
        params: &mut dyn ParamSource,
    ) -> Result<(), StageFailure> {
        let shopper = match params.existing_shopper() {
            Some(existing) => {
                // Operator-supplied ids are trusted; no verification call.
                tracing::info!(shopper = %existing, "reusing existing shopper");
                existing
            }
            None => {
                let (login_name, email) = generated_identity();
                tracing::info!(%login_name, %email, "creating shopper");
                self.storefront
                    .create_shopper(&login_name, &email)
                    .await
                    .map_err(|err| StageFailure::call(Stage::Provision, err))?
            }
        };
        report.shopper_id = Some(shopper.clone());
        tracing::info!(%shopper, "shopper ready");

        let token = self
            .storefront
            .issue_token(&shopper)
            .await
            .map_err(|err| StageFailure::call(Stage::Authenticate, err))?;
        tracing::info!("token issued");

        // Downstream stages do not depend on contact data.
        if let Err(err) = self.storefront.patch_contact(&shopper, &token).await {
            tracing::warn!(
                stage = %Stage::PatchContact,
                kind = err.kind(),
                error = %err,
                "contact enrichment failed; continuing"
            );
        }

        let card = params.card_params(self.config);
        let encrypted = self
            .storefront
            .encrypt_card(&card.pan)
            .await
            .map_err(|err| StageFailure::call(Stage::EncryptCard, err))?;
        tracing::info!("card encrypted");

        let payment_profile = self
            .storefront
            .register_payment_method(
                &shopper,
                &token,
                &encrypted,
                &card.network,
                &card.billing_country,
                &card.currency,
            )
            .await
            .map_err(|err| StageFailure::call(Stage::RegisterPayment, err))?;
        tracing::info!(%payment_profile, "payment method registered");

        let item = params.basket_params(self.config);
        match self
            .storefront
            .add_item(&shopper, &item.country, &item.currency, &item.product_id)
            .await
        {
            Ok(outcome) => {
                if outcome.is_success() {
                    tracing::info!(product_id = %item.product_id, "item added to basket");
                } else {
                    tracing::warn!(%outcome, "basket did not confirm the item");
                }
                let confirmed = outcome.is_success();
                report.basket = Some(outcome.clone());
                if !confirmed && self.config.pipeline.abort_on_basket_failure {
                    return Err(StageFailure {
                        stage: Stage::AddToCart,
                        error: StageError::Basket(outcome),
                    });
                }
            }
            Err(err) => {
                if self.config.pipeline.abort_on_basket_failure {
                    return Err(StageFailure::call(Stage::AddToCart, err));
                }
                tracing::warn!(
                    stage = %Stage::AddToCart,
                    kind = err.kind(),
                    error = %err,
                    "basket call failed; continuing"
                );
            }
        }

        let seller_config_uri = params.seller_config_uri(self.config);
        match self
            .storefront
            .settle_purchase(
                &shopper,
                &token,
                &payment_profile,
                &self.config.card.cvv,
                &seller_config_uri,
            )
            .await
        {
            Ok(order) => {
                tracing::info!(%order, "purchase settled");
                report.order_id = Some(order);
            }
            Err(err) => {
                // Reported, not fatal: the run completes and the report still
                // carries the shopper id for manual resumption.
                tracing::error!(
                    stage = %Stage::Settle,
                    kind = err.kind(),
                    error = %err,
                    "purchase failed; completing without an order"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DefaultParams;
    use crate::testing::ScriptedStorefront;

    fn config() -> RunConfig {
        RunConfig::default()
    }

    #[tokio::test]
    async fn test_happy_path_runs_every_stage_in_order() {
        let storefront = ScriptedStorefront::happy();
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        assert!(!report.is_aborted());
        assert_eq!(report.shopper_id, Some(ShopperId::new("900001")));
        assert_eq!(report.order_id, Some(OrderId("ORD-1".into())));
        assert_eq!(report.basket, Some(BasketOutcome::Success));
        assert_eq!(
            storefront.calls(),
            vec![
                "create_shopper",
                "issue_token",
                "patch_contact",
                "encrypt_card",
                "register_payment_method",
                "add_item",
                "settle_purchase",
            ]
        );
    }

    #[tokio::test]
    async fn test_fatal_token_failure_stops_before_later_stages() {
        let storefront = ScriptedStorefront::failing_at("issue_token", 500);
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        let failure = report.aborted.as_ref().expect("run should abort");
        assert_eq!(failure.stage, Stage::Authenticate);
        // The shopper had already been provisioned; the report keeps it.
        assert!(report.shopper_id.is_some());
        // Nothing after the failing stage was invoked.
        assert_eq!(storefront.calls(), vec!["create_shopper", "issue_token"]);
    }

    #[tokio::test]
    async fn test_patch_failure_does_not_block_registration() {
        let storefront = ScriptedStorefront::failing_at("patch_contact", 500);
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        assert!(!report.is_aborted());
        assert!(storefront.calls().contains(&"register_payment_method"));
        assert!(report.order_id.is_some());
    }

    #[tokio::test]
    async fn test_basket_rejection_still_settles_by_default() {
        let storefront =
            ScriptedStorefront::with_basket(BasketOutcome::Rejected("out of stock".into()));
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        assert!(!report.is_aborted());
        assert_eq!(
            report.basket,
            Some(BasketOutcome::Rejected("out of stock".into()))
        );
        assert!(storefront.calls().contains(&"settle_purchase"));
    }

    #[tokio::test]
    async fn test_basket_rejection_aborts_under_policy() {
        let storefront =
            ScriptedStorefront::with_basket(BasketOutcome::Rejected("out of stock".into()));
        let mut config = config();
        config.pipeline.abort_on_basket_failure = true;
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        let failure = report.aborted.as_ref().expect("run should abort");
        assert_eq!(failure.stage, Stage::AddToCart);
        assert!(!storefront.calls().contains(&"settle_purchase"));
    }

    #[tokio::test]
    async fn test_basket_call_failure_continues_by_default() {
        let storefront = ScriptedStorefront::failing_at("add_item", 502);
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        assert!(!report.is_aborted());
        assert_eq!(report.basket, None);
        assert!(storefront.calls().contains(&"settle_purchase"));
    }

    #[tokio::test]
    async fn test_settlement_failure_completes_without_order() {
        let storefront = ScriptedStorefront::failing_at("settle_purchase", 500);
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut DefaultParams).await;

        assert!(!report.is_aborted());
        assert_eq!(report.order_id, None);
        assert!(report.shopper_id.is_some());
    }

    #[tokio::test]
    async fn test_existing_shopper_skips_creation() {
        struct Reuse;
        impl crate::params::ParamSource for Reuse {
            fn existing_shopper(&mut self) -> Option<ShopperId> {
                Some(ShopperId::new("777001"))
            }
            fn card_params(&mut self, config: &RunConfig) -> crate::params::CardParams {
                crate::params::CardParams::from_defaults(config)
            }
            fn basket_params(&mut self, config: &RunConfig) -> crate::params::BasketParams {
                crate::params::BasketParams::from_defaults(config)
            }
            fn seller_config_uri(&mut self, config: &RunConfig) -> String {
                config.purchase.seller_config_uri.clone()
            }
        }

        let storefront = ScriptedStorefront::happy();
        let config = config();
        let driver = PurchaseDriver::new(&config, &storefront);

        let report = driver.run("test", &mut Reuse).await;

        assert_eq!(report.shopper_id, Some(ShopperId::new("777001")));
        assert!(!storefront.calls().contains(&"create_shopper"));
        assert_eq!(storefront.calls()[0], "issue_token");
    }

    #[test]
    fn test_generated_identity_shape() {
        let (login, email) = generated_identity();
        assert!(login.starts_with("qarun"));
        assert_eq!(login.len(), "qarun".len() + 8);
        assert!(email.starts_with("caravel.qa+"));
        assert!(email.ends_with("@mailinator.com"));

        // Suffixes are random per run.
        let (other_login, _) = generated_identity();
        assert_ne!(login, other_login);
    }
}

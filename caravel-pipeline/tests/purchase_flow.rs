use caravel_core::model::BasketOutcome;
use caravel_core::RunConfig;
use caravel_pipeline::testing::ScriptedStorefront;
use caravel_pipeline::{DefaultParams, PurchaseDriver, Stage};

#[tokio::test]
async fn automatic_run_produces_order_and_shopper() {
    let storefront = ScriptedStorefront::happy();
    let config = RunConfig::default();
    let driver = PurchaseDriver::new(&config, &storefront);

    let report = driver.run("test", &mut DefaultParams).await;

    assert!(!report.is_aborted());
    assert!(report.shopper_id.is_some());
    assert!(report.order_id.is_some());
    assert_eq!(report.basket, Some(BasketOutcome::Success));
    assert_eq!(report.environment, "test");
}

#[tokio::test]
async fn fatal_registration_failure_aborts_before_basket_and_settlement() {
    let storefront = ScriptedStorefront::failing_at("register_payment_method", 500);
    let config = RunConfig::default();
    let driver = PurchaseDriver::new(&config, &storefront);

    let report = driver.run("test", &mut DefaultParams).await;

    let failure = report.aborted.as_ref().expect("run should abort");
    assert_eq!(failure.stage, Stage::RegisterPayment);
    assert_eq!(failure.error.kind(), "http-status");

    let calls = storefront.calls();
    assert!(!calls.contains(&"add_item"));
    assert!(!calls.contains(&"settle_purchase"));
    // Partial state survives for manual resumption.
    assert!(report.shopper_id.is_some());
    assert!(report.order_id.is_none());
}

#[tokio::test]
async fn fatal_encryption_failure_aborts_run() {
    let storefront = ScriptedStorefront::failing_at("encrypt_card", 500);
    let config = RunConfig::default();
    let driver = PurchaseDriver::new(&config, &storefront);

    let report = driver.run("dev", &mut DefaultParams).await;

    let failure = report.aborted.as_ref().expect("run should abort");
    assert_eq!(failure.stage, Stage::EncryptCard);
    assert!(!storefront.calls().contains(&"register_payment_method"));
}

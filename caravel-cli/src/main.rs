use anyhow::Context;
use caravel_core::{Endpoints, RunConfig};
use caravel_gateway::HttpStorefront;
use caravel_pipeline::{DefaultParams, PurchaseDriver, RunReport};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod console;
use console::{prompt_line, ConsoleParams};

#[derive(Parser, Debug)]
#[command(
    name = "caravel",
    version,
    about = "Drive an end-to-end purchase path in a chosen environment"
)]
struct Cli {
    /// Environment label; skips the startup prompt
    #[arg(long)]
    env: Option<String>,

    /// Use built-in defaults for every stage, never prompt
    #[arg(long)]
    non_interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caravel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = RunConfig::load().context("failed to load configuration")?;

    println!("============================================================");
    println!("              caravel purchase-path runner");
    println!("============================================================");

    let (environment, interactive) = select_mode(&cli, &config)?;
    println!("Using environment: {environment}");

    let endpoints = Endpoints::resolve(&config.endpoints, &environment);
    print_endpoints(&endpoints);

    let storefront = HttpStorefront::connect(config.clone(), &endpoints)
        .context("failed to build HTTP clients")?;
    let driver = PurchaseDriver::new(&config, &storefront);

    let report = if interactive {
        println!("Interactive run: press Enter at any prompt to keep the defaults.");
        let mut params = ConsoleParams::new();
        driver.run(&environment, &mut params).await
    } else {
        println!("Automatic run: every step uses built-in defaults.");
        driver.run(&environment, &mut DefaultParams).await
    };

    print_summary(&report);

    if report.is_aborted() {
        std::process::exit(1);
    }
    Ok(())
}

/// Pick the environment and run mode.
///
/// Without `--env`, the startup prompt decides both at once: an empty answer
/// means the default environment with an automatic run, a named environment
/// means an interactive run (unless `--non-interactive` suppresses the
/// per-stage prompts).
fn select_mode(cli: &Cli, config: &RunConfig) -> anyhow::Result<(String, bool)> {
    if let Some(env) = &cli.env {
        return Ok((env.clone(), !cli.non_interactive));
    }

    let answer = prompt_line(&format!(
        "Environment label (e.g. 'dev', 'staging'), or press Enter for '{}' \
         with an automatic run: ",
        config.environment.default_label
    ))
    .context("failed to read the environment prompt")?;

    if answer.is_empty() {
        Ok((config.environment.default_label.clone(), false))
    } else {
        Ok((answer, !cli.non_interactive))
    }
}

fn print_endpoints(endpoints: &Endpoints) {
    println!("\nService endpoints for this run:");
    println!("  shopper:    {}", endpoints.shopper);
    println!("  sso:        {}", endpoints.sso);
    println!("  payment:    {}", endpoints.payment);
    println!("  basket:     {}", endpoints.basket);
    println!("  encryption: {}", endpoints.encrypt);
}

fn print_summary(report: &RunReport) {
    println!("\n--- RUN SUMMARY ({}) ---", report.environment);

    if let Some(failure) = &report.aborted {
        println!("Run aborted during {}: {}", failure.stage, failure.error);
    }

    match &report.shopper_id {
        Some(id) => println!("Shopper ID: {id}"),
        None => println!("No shopper was provisioned."),
    }

    if let Some(outcome) = &report.basket {
        println!("Basket: {outcome}");
    }

    match &report.order_id {
        Some(order) => println!("Order ID: {order}"),
        None if !report.is_aborted() => println!("Purchase failed - no order ID."),
        None => {}
    }
}

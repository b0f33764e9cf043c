use caravel_core::model::ShopperId;
use caravel_core::{RunConfig, Sensitive};
use caravel_pipeline::{read_override, BasketParams, CardParams, OverrideInput, ParamSource};
use std::io::{self, Write};

/// Print a prompt and read one trimmed line from stdin.
pub fn prompt_line(text: &str) -> io::Result<String> {
    print!("{text}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Interactive parameter source: asks the operator before each
/// parameter-bearing stage. An empty answer keeps the defaults; a malformed
/// multi-field answer is reported and falls back to the defaults without
/// re-prompting.
pub struct ConsoleParams;

impl ConsoleParams {
    pub fn new() -> Self {
        Self
    }

    fn ask(&self, text: &str) -> String {
        prompt_line(text).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not read operator input; using defaults");
            String::new()
        })
    }
}

impl Default for ConsoleParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSource for ConsoleParams {
    fn existing_shopper(&mut self) -> Option<ShopperId> {
        let answer =
            self.ask("\nExisting shopper id, or press Enter to create a new shopper: ");
        if answer.is_empty() {
            None
        } else {
            println!("Using existing shopper id: {answer}");
            Some(ShopperId::new(answer))
        }
    }

    fn card_params(&mut self, config: &RunConfig) -> CardParams {
        println!("\n--- Card and payment profile ---");
        let answer = self.ask(&format!(
            "PAN, network, billing country, currency (e.g. 4111111111111111 Visa US USD), \
             or Enter for defaults ({} {} {} {}): ",
            config.card.pan_last4(),
            config.card.network,
            config.card.billing_country,
            config.card.currency
        ));

        match read_override(&answer, 4) {
            OverrideInput::Fields(fields) => {
                println!(
                    "Using card override: network={}, country={}, currency={}",
                    fields[1], fields[2], fields[3]
                );
                CardParams {
                    pan: Sensitive::new(fields[0].to_string()),
                    network: fields[1].to_string(),
                    billing_country: fields[2].to_string(),
                    currency: fields[3].to_string(),
                }
            }
            OverrideInput::WrongCount(count) => {
                println!("Expected 4 fields, got {count}; using defaults.");
                CardParams::from_defaults(config)
            }
            OverrideInput::Empty => {
                println!("Using default card details.");
                CardParams::from_defaults(config)
            }
        }
    }

    fn basket_params(&mut self, config: &RunConfig) -> BasketParams {
        println!("\n--- Basket ---");
        let answer = self.ask(&format!(
            "Country code, currency, product id (e.g. US USD 12345), \
             or Enter for defaults ({} {} {}): ",
            config.basket.country, config.basket.currency, config.basket.product_id
        ));

        match read_override(&answer, 3) {
            OverrideInput::Fields(fields) => {
                println!(
                    "Using basket override: country={}, currency={}, product={}",
                    fields[0], fields[1], fields[2]
                );
                BasketParams {
                    country: fields[0].to_string(),
                    currency: fields[1].to_string(),
                    product_id: fields[2].to_string(),
                }
            }
            OverrideInput::WrongCount(count) => {
                println!("Expected 3 fields, got {count}; using defaults.");
                BasketParams::from_defaults(config)
            }
            OverrideInput::Empty => {
                println!("Using default basket details.");
                BasketParams::from_defaults(config)
            }
        }
    }

    fn seller_config_uri(&mut self, config: &RunConfig) -> String {
        println!("\n--- Purchase ---");
        let answer = self.ask(&format!(
            "Seller config URI, or Enter for the default ({}): ",
            config.purchase.seller_config_uri
        ));

        let uri = if answer.is_empty() {
            config.purchase.seller_config_uri.clone()
        } else {
            answer
        };
        println!("Using seller config URI: {uri}");
        uri
    }
}

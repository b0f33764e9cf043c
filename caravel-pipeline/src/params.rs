use caravel_core::model::ShopperId;
use caravel_core::{RunConfig, Sensitive};

/// Card parameters that override together: the number, its network, and the
/// billing country and currency the profile is registered under.
#[derive(Debug, Clone)]
pub struct CardParams {
    pub pan: Sensitive<String>,
    pub network: String,
    pub billing_country: String,
    pub currency: String,
}

impl CardParams {
    pub fn from_defaults(config: &RunConfig) -> Self {
        Self {
            pan: config.card.pan.clone(),
            network: config.card.network.clone(),
            billing_country: config.card.billing_country.clone(),
            currency: config.card.currency.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasketParams {
    pub country: String,
    pub currency: String,
    pub product_id: String,
}

impl BasketParams {
    pub fn from_defaults(config: &RunConfig) -> Self {
        Self {
            country: config.basket.country.clone(),
            currency: config.basket.currency.clone(),
            product_id: config.basket.product_id.clone(),
        }
    }
}

/// Where per-stage parameters come from.
///
/// The automatic and interactive run modes are the same driver wired to
/// different implementations of this trait: one answers from configuration
/// alone, the other asks the operator first and falls back to configuration.
pub trait ParamSource {
    /// An existing shopper id to reuse; `None` provisions a fresh one.
    fn existing_shopper(&mut self) -> Option<ShopperId>;

    fn card_params(&mut self, config: &RunConfig) -> CardParams;

    fn basket_params(&mut self, config: &RunConfig) -> BasketParams;

    fn seller_config_uri(&mut self, config: &RunConfig) -> String;
}

/// Defaults-only source used by automatic runs.
pub struct DefaultParams;

impl ParamSource for DefaultParams {
    fn existing_shopper(&mut self) -> Option<ShopperId> {
        None
    }

    fn card_params(&mut self, config: &RunConfig) -> CardParams {
        CardParams::from_defaults(config)
    }

    fn basket_params(&mut self, config: &RunConfig) -> BasketParams {
        BasketParams::from_defaults(config)
    }

    fn seller_config_uri(&mut self, config: &RunConfig) -> String {
        config.purchase.seller_config_uri.clone()
    }
}

/// Result of reading one override line from the operator.
#[derive(Debug, PartialEq, Eq)]
pub enum OverrideInput<'a> {
    /// Blank answer: keep the defaults, silently.
    Empty,
    /// The expected number of whitespace-separated fields.
    Fields(Vec<&'a str>),
    /// Wrong field count; the caller reports it and keeps the defaults
    /// rather than re-prompting.
    WrongCount(usize),
}

/// Split an override answer into the expected number of fields.
pub fn read_override(line: &str, expected: usize) -> OverrideInput<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return OverrideInput::Empty;
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() == expected {
        OverrideInput::Fields(fields)
    } else {
        OverrideInput::WrongCount(fields.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_keeps_defaults() {
        assert_eq!(read_override("   ", 4), OverrideInput::Empty);
        assert_eq!(read_override("", 3), OverrideInput::Empty);
    }

    #[test]
    fn test_matching_field_count_is_accepted() {
        let input = read_override("4111111111111111 Visa US USD", 4);
        assert_eq!(
            input,
            OverrideInput::Fields(vec!["4111111111111111", "Visa", "US", "USD"])
        );
    }

    #[test]
    fn test_wrong_field_count_is_reported() {
        assert_eq!(read_override("US USD", 3), OverrideInput::WrongCount(2));
        assert_eq!(
            read_override("US USD 8007 extra", 3),
            OverrideInput::WrongCount(4)
        );
    }

    #[test]
    fn test_default_params_mirror_config() {
        let config = RunConfig::default();
        let mut source = DefaultParams;

        assert_eq!(source.existing_shopper(), None);
        let card = source.card_params(&config);
        assert_eq!(card.network, config.card.network);
        assert_eq!(card.currency, config.card.currency);
        let basket = source.basket_params(&config);
        assert_eq!(basket.product_id, config.basket.product_id);
        assert_eq!(
            source.seller_config_uri(&config),
            config.purchase.seller_config_uri
        );
    }
}

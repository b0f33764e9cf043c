use crate::config::EndpointTemplates;

/// Resolved base addresses for one environment.
///
/// Built once before the first stage runs; every required service address is
/// present by construction.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub label: String,
    pub shopper: String,
    pub sso: String,
    pub payment: String,
    pub basket: String,
    pub encrypt: String,
}

impl Endpoints {
    /// Substitute the environment label into each service template.
    ///
    /// A template without the `{env}` placeholder (other than the local
    /// encryption helper) is a programming error in the configuration
    /// defaults, not a runtime condition.
    pub fn resolve(templates: &EndpointTemplates, label: &str) -> Self {
        for template in [
            &templates.shopper,
            &templates.sso,
            &templates.payment,
            &templates.basket,
        ] {
            debug_assert!(template.contains("{env}"), "template lacks {{env}}: {template}");
        }

        Self {
            label: label.to_string(),
            shopper: fill(&templates.shopper, label),
            sso: fill(&templates.sso, label),
            payment: fill(&templates.payment, label),
            basket: fill(&templates.basket, label),
            encrypt: fill(&templates.encrypt, label),
        }
    }
}

fn fill(template: &str, label: &str) -> String {
    template.replace("{env}", label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_substitutes_label_everywhere() {
        let endpoints = Endpoints::resolve(&EndpointTemplates::default(), "staging");

        for address in [
            &endpoints.shopper,
            &endpoints.sso,
            &endpoints.payment,
            &endpoints.basket,
        ] {
            assert!(!address.is_empty());
            assert!(address.contains("staging"), "label missing in {address}");
            assert!(!address.contains("{env}"));
        }
    }

    #[test]
    fn test_resolve_keeps_local_encrypt_address() {
        let endpoints = Endpoints::resolve(&EndpointTemplates::default(), "dev");
        assert_eq!(endpoints.encrypt, "http://127.0.0.1:3001/api");
    }

    #[test]
    fn test_resolve_records_label() {
        let endpoints = Endpoints::resolve(&EndpointTemplates::default(), "perf1");
        assert_eq!(endpoints.label, "perf1");
    }
}

use crate::Instrument;
use crate::instruments::likert_subscale;
use crate::scoring::Domain;

/// Big Five Inventory (BFI-44 style): five domain scores as 1–5 item means.
/// Norms are adult self-report means and SDs for English-language samples.
pub struct BigFiveInventory;

impl Instrument for BigFiveInventory {
    fn id(&self) -> &str {
        "big_five"
    }

    fn name(&self) -> &str {
        "Big Five Inventory"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            vec![Domain {
                id: "domains".to_string(),
                name: "Personality Domains".to_string(),
                subscales: vec![
                    likert_subscale("openness", "Openness", 3.92, 0.66),
                    likert_subscale("conscientiousness", "Conscientiousness", 3.45, 0.73),
                    likert_subscale("extraversion", "Extraversion", 3.25, 0.90),
                    likert_subscale("agreeableness", "Agreeableness", 3.64, 0.72),
                    likert_subscale("neuroticism", "Neuroticism", 3.07, 0.86),
                ],
                description: Some("Higher scores indicate more of the named trait".to_string()),
            }]
        });
        &DOMAINS
    }
}

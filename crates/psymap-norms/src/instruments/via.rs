use crate::Instrument;
use crate::instruments::likert_subscale;
use crate::scoring::{Domain, Subscale};

/// VIA Inventory of Strengths: 24 character strengths grouped under six
/// virtues, each scored as a 1–5 item mean.
pub struct ViaInventory;

impl Instrument for ViaInventory {
    fn id(&self) -> &str {
        "via_is"
    }

    fn name(&self) -> &str {
        "VIA Inventory of Strengths"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            vec![
                virtue(
                    "wisdom",
                    "Wisdom and Knowledge",
                    vec![
                        likert_subscale("creativity", "Creativity", 3.65, 0.70),
                        likert_subscale("curiosity", "Curiosity", 3.95, 0.60),
                        likert_subscale("judgment", "Judgment", 3.90, 0.58),
                        likert_subscale("love_of_learning", "Love of Learning", 3.70, 0.68),
                        likert_subscale("perspective", "Perspective", 3.70, 0.58),
                    ],
                ),
                virtue(
                    "courage",
                    "Courage",
                    vec![
                        likert_subscale("bravery", "Bravery", 3.60, 0.62),
                        likert_subscale("perseverance", "Perseverance", 3.55, 0.70),
                        likert_subscale("honesty", "Honesty", 3.95, 0.55),
                        likert_subscale("zest", "Zest", 3.45, 0.72),
                    ],
                ),
                virtue(
                    "humanity",
                    "Humanity",
                    vec![
                        likert_subscale("love", "Love", 3.90, 0.65),
                        likert_subscale("kindness", "Kindness", 4.00, 0.55),
                        likert_subscale("social_intelligence", "Social Intelligence", 3.75, 0.58),
                    ],
                ),
                virtue(
                    "justice",
                    "Justice",
                    vec![
                        likert_subscale("teamwork", "Teamwork", 3.75, 0.58),
                        likert_subscale("fairness", "Fairness", 4.00, 0.55),
                        likert_subscale("leadership", "Leadership", 3.70, 0.60),
                    ],
                ),
                virtue(
                    "temperance",
                    "Temperance",
                    vec![
                        likert_subscale("forgiveness", "Forgiveness", 3.60, 0.68),
                        likert_subscale("humility", "Humility", 3.45, 0.65),
                        likert_subscale("prudence", "Prudence", 3.50, 0.62),
                        likert_subscale("self_regulation", "Self-Regulation", 3.30, 0.70),
                    ],
                ),
                virtue(
                    "transcendence",
                    "Transcendence",
                    vec![
                        likert_subscale(
                            "appreciation_of_beauty",
                            "Appreciation of Beauty and Excellence",
                            3.70,
                            0.70,
                        ),
                        likert_subscale("gratitude", "Gratitude", 3.95, 0.62),
                        likert_subscale("hope", "Hope", 3.70, 0.68),
                        likert_subscale("humor", "Humor", 3.85, 0.62),
                        likert_subscale("spirituality", "Spirituality", 3.20, 0.95),
                    ],
                ),
            ]
        });
        &DOMAINS
    }
}

fn virtue(id: &str, name: &str, subscales: Vec<Subscale>) -> Domain {
    Domain {
        id: id.to_string(),
        name: name.to_string(),
        subscales,
        description: None,
    }
}

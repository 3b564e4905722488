use psymap_core::models::clinical::{CLINICAL_MAX, SeverityBand, Subscale as DistressSubscale};

use crate::Instrument;
use crate::scoring::{Domain, ScoreRange, ScoreType, SeverityCutoffs, Subscale};

/// DASS-21: Depression Anxiety Stress Scales, 21-item short form.
/// Scores are item sums ×2 so they sit on the DASS-42 scale (0–42).
/// Higher = more distress.
pub struct Dass21;

impl Dass21 {
    /// Published DASS severity cut-offs on the 0–42 scale.
    pub fn cutoffs(subscale: DistressSubscale) -> SeverityCutoffs {
        match subscale {
            DistressSubscale::Depression => SeverityCutoffs {
                mild: 10.0,
                moderate: 14.0,
                severe: 21.0,
                extremely_severe: 28.0,
            },
            DistressSubscale::Anxiety => SeverityCutoffs {
                mild: 8.0,
                moderate: 10.0,
                severe: 15.0,
                extremely_severe: 20.0,
            },
            DistressSubscale::Stress => SeverityCutoffs {
                mild: 15.0,
                moderate: 19.0,
                severe: 26.0,
                extremely_severe: 34.0,
            },
        }
    }

    pub fn severity(subscale: DistressSubscale, score: f64) -> SeverityBand {
        Self::cutoffs(subscale).classify(score)
    }
}

impl Instrument for Dass21 {
    fn id(&self) -> &str {
        "dass21"
    }

    fn name(&self) -> &str {
        "DASS-21"
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: std::sync::LazyLock<Vec<Domain>> = std::sync::LazyLock::new(|| {
            let scaled = ScoreRange {
                min: 0.0,
                max: f64::from(CLINICAL_MAX),
                step: Some(1.0),
            };

            vec![Domain {
                id: "distress".to_string(),
                name: "Distress Subscales".to_string(),
                subscales: DistressSubscale::ALL
                    .into_iter()
                    .map(|s| Subscale {
                        id: s.id().to_string(),
                        name: s.name().to_string(),
                        score_type: ScoreType::Scaled,
                        range: scaled,
                        norm: None,
                        cutoffs: Some(Dass21::cutoffs(s)),
                        description: None,
                    })
                    .collect(),
                description: Some("Higher scores indicate greater distress".to_string()),
            }]
        });
        &DOMAINS
    }
}

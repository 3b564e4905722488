use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InputError;

use super::mbti::MbtiType;

/// Lowest valid raw self-report average.
pub const RAW_MIN: f64 = 1.0;
/// Highest valid raw self-report average.
pub const RAW_MAX: f64 = 5.0;

/// Which questionnaire family a trait belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TraitFamily {
    BigFive,
    CharacterStrength,
}

/// Every scored trait the engine understands: the Big Five domains followed
/// by the 24 VIA character strengths.
///
/// The serialized id (`snake_case`) doubles as the subscale id in the norm
/// tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    // Wisdom
    Creativity,
    Curiosity,
    Judgment,
    LoveOfLearning,
    Perspective,
    // Courage
    Bravery,
    Perseverance,
    Honesty,
    Zest,
    // Humanity
    Love,
    Kindness,
    SocialIntelligence,
    // Justice
    Teamwork,
    Fairness,
    Leadership,
    // Temperance
    Forgiveness,
    Humility,
    Prudence,
    SelfRegulation,
    // Transcendence
    AppreciationOfBeauty,
    Gratitude,
    Hope,
    Humor,
    Spirituality,
}

impl Trait {
    pub const BIG_FIVE: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub const CHARACTER_STRENGTHS: [Trait; 24] = [
        Trait::Creativity,
        Trait::Curiosity,
        Trait::Judgment,
        Trait::LoveOfLearning,
        Trait::Perspective,
        Trait::Bravery,
        Trait::Perseverance,
        Trait::Honesty,
        Trait::Zest,
        Trait::Love,
        Trait::Kindness,
        Trait::SocialIntelligence,
        Trait::Teamwork,
        Trait::Fairness,
        Trait::Leadership,
        Trait::Forgiveness,
        Trait::Humility,
        Trait::Prudence,
        Trait::SelfRegulation,
        Trait::AppreciationOfBeauty,
        Trait::Gratitude,
        Trait::Hope,
        Trait::Humor,
        Trait::Spirituality,
    ];

    /// All traits, Big Five first.
    pub fn all() -> impl Iterator<Item = Trait> {
        Self::BIG_FIVE
            .into_iter()
            .chain(Self::CHARACTER_STRENGTHS)
    }

    pub fn family(&self) -> TraitFamily {
        if Self::BIG_FIVE.contains(self) {
            TraitFamily::BigFive
        } else {
            TraitFamily::CharacterStrength
        }
    }

    /// Machine id, identical to the serialized form.
    pub fn id(&self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
            Trait::Creativity => "creativity",
            Trait::Curiosity => "curiosity",
            Trait::Judgment => "judgment",
            Trait::LoveOfLearning => "love_of_learning",
            Trait::Perspective => "perspective",
            Trait::Bravery => "bravery",
            Trait::Perseverance => "perseverance",
            Trait::Honesty => "honesty",
            Trait::Zest => "zest",
            Trait::Love => "love",
            Trait::Kindness => "kindness",
            Trait::SocialIntelligence => "social_intelligence",
            Trait::Teamwork => "teamwork",
            Trait::Fairness => "fairness",
            Trait::Leadership => "leadership",
            Trait::Forgiveness => "forgiveness",
            Trait::Humility => "humility",
            Trait::Prudence => "prudence",
            Trait::SelfRegulation => "self_regulation",
            Trait::AppreciationOfBeauty => "appreciation_of_beauty",
            Trait::Gratitude => "gratitude",
            Trait::Hope => "hope",
            Trait::Humor => "humor",
            Trait::Spirituality => "spirituality",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
            Trait::Creativity => "Creativity",
            Trait::Curiosity => "Curiosity",
            Trait::Judgment => "Judgment",
            Trait::LoveOfLearning => "Love of Learning",
            Trait::Perspective => "Perspective",
            Trait::Bravery => "Bravery",
            Trait::Perseverance => "Perseverance",
            Trait::Honesty => "Honesty",
            Trait::Zest => "Zest",
            Trait::Love => "Love",
            Trait::Kindness => "Kindness",
            Trait::SocialIntelligence => "Social Intelligence",
            Trait::Teamwork => "Teamwork",
            Trait::Fairness => "Fairness",
            Trait::Leadership => "Leadership",
            Trait::Forgiveness => "Forgiveness",
            Trait::Humility => "Humility",
            Trait::Prudence => "Prudence",
            Trait::SelfRegulation => "Self-Regulation",
            Trait::AppreciationOfBeauty => "Appreciation of Beauty and Excellence",
            Trait::Gratitude => "Gratitude",
            Trait::Hope => "Hope",
            Trait::Humor => "Humor",
            Trait::Spirituality => "Spirituality",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Trait {
    type Err = InputError;

    /// Accepts the machine id; spaces and dashes are read as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Trait::all()
            .find(|t| t.id() == normalized)
            .ok_or_else(|| InputError::UnknownTrait(s.to_string()))
    }
}

/// Raw self-report averages for one person, plus an optional MBTI type.
///
/// Big Five traits are required for analysis (at least one of the five must
/// be present); character strengths are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TraitBundle {
    #[serde(default)]
    pub scores: BTreeMap<Trait, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub mbti: Option<MbtiType>,
}

impl TraitBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, t: Trait, raw: f64) -> Self {
        self.scores.insert(t, raw);
        self
    }

    pub fn with_mbti(mut self, mbti: MbtiType) -> Self {
        self.mbti = Some(mbti);
        self
    }

    /// Number of Big Five traits present.
    pub fn big_five_count(&self) -> usize {
        Trait::BIG_FIVE
            .iter()
            .filter(|t| self.scores.contains_key(t))
            .count()
    }

    pub fn has_complete_big_five(&self) -> bool {
        self.big_five_count() == Trait::BIG_FIVE.len()
    }

    pub fn has_strengths(&self) -> bool {
        self.scores
            .keys()
            .any(|t| t.family() == TraitFamily::CharacterStrength)
    }

    /// Check every raw value against [`RAW_MIN`, `RAW_MAX`] and the Big Five
    /// precondition. Range errors are reported before the missing-input error.
    pub fn validate(&self) -> Result<(), InputError> {
        self.validate_ranges()?;
        if self.big_five_count() == 0 {
            return Err(InputError::MissingRequiredInput(
                "at least one Big Five trait score is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Range check only; a bundle without Big Five scores passes.
    pub fn validate_ranges(&self) -> Result<(), InputError> {
        match self
            .scores
            .iter()
            .find(|(_, v)| !v.is_finite() || !(RAW_MIN..=RAW_MAX).contains(*v))
        {
            Some((t, &value)) => Err(InputError::InvalidRawScore {
                field: t.id().to_string(),
                value,
                min: RAW_MIN,
                max: RAW_MAX,
            }),
            None => Ok(()),
        }
    }
}

/// A raw score placed on its reference distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormalizedTrait {
    pub name: Trait,
    pub raw_value: f64,
    /// Percentile rank, 0–100.
    pub percentile: f64,
}

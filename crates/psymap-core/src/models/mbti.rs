use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attitude {
    Extraversion,
    Introversion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perceiving {
    Sensing,
    Intuition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Judging {
    Thinking,
    Feeling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Judging,
    Perceiving,
}

/// One of the 16 four-letter MBTI codes.
///
/// Serialized as the bare code (`"INTJ"`). Parsing is case-insensitive and
/// drops an `-A` / `-T` identity suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MbtiType {
    pub attitude: Attitude,
    pub perceiving: Perceiving,
    pub judging: Judging,
    pub orientation: Orientation,
}

impl MbtiType {
    pub fn code(&self) -> String {
        let letters = [
            match self.attitude {
                Attitude::Extraversion => 'E',
                Attitude::Introversion => 'I',
            },
            match self.perceiving {
                Perceiving::Sensing => 'S',
                Perceiving::Intuition => 'N',
            },
            match self.judging {
                Judging::Thinking => 'T',
                Judging::Feeling => 'F',
            },
            match self.orientation {
                Orientation::Judging => 'J',
                Orientation::Perceiving => 'P',
            },
        ];
        letters.iter().collect()
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for MbtiType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidMbtiType(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        let code = upper
            .strip_suffix("-A")
            .or_else(|| upper.strip_suffix("-T"))
            .unwrap_or(&upper);

        let letters: Vec<char> = code.chars().collect();
        let &[a, p, j, o] = letters.as_slice() else {
            return Err(invalid());
        };

        let attitude = match a {
            'E' => Attitude::Extraversion,
            'I' => Attitude::Introversion,
            _ => return Err(invalid()),
        };
        let perceiving = match p {
            'S' => Perceiving::Sensing,
            'N' => Perceiving::Intuition,
            _ => return Err(invalid()),
        };
        let judging = match j {
            'T' => Judging::Thinking,
            'F' => Judging::Feeling,
            _ => return Err(invalid()),
        };
        let orientation = match o {
            'J' => Orientation::Judging,
            'P' => Orientation::Perceiving,
            _ => return Err(invalid()),
        };

        Ok(MbtiType {
            attitude,
            perceiving,
            judging,
            orientation,
        })
    }
}

impl Serialize for MbtiType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MbtiType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

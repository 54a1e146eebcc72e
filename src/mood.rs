//! Categorical values recorded with every check-in.
//!
//! The overall mood is a 1–5 scale and sleep is one of five fixed hour
//! buckets. Both have an ordinal form (used for averages and the chart axis)
//! and a label form (used on the wire and in the page). Conversions are total
//! on their domain and return [`DomainError`] for anything else.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("mood must be between 1 and 5, got {0}")]
    MoodOutOfRange(i64),
    #[error("unknown sleep range '{0}'")]
    UnknownSleepRange(String),
    #[error("sleep ordinal must be between 1 and 5, got {0}")]
    SleepOrdinalOutOfRange(u8),
    #[error("unknown feeling '{0}'")]
    UnknownFeeling(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mood {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl Mood {
    pub fn from_value(value: i64) -> Result<Self, DomainError> {
        match value {
            1 => Ok(Mood::VerySad),
            2 => Ok(Mood::Sad),
            3 => Ok(Mood::Neutral),
            4 => Ok(Mood::Happy),
            5 => Ok(Mood::VeryHappy),
            other => Err(DomainError::MoodOutOfRange(other)),
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Mood::VerySad => 1,
            Mood::Sad => 2,
            Mood::Neutral => 3,
            Mood::Happy => 4,
            Mood::VeryHappy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::VerySad => "Very Sad",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::VeryHappy => "Very Happy",
        }
    }

    /// Background used for the average-mood card.
    pub fn color(self) -> &'static str {
        match self {
            Mood::VerySad => "#FF9B99",
            Mood::Sad => "#B8B1FF",
            Mood::Neutral => "#89CAFF",
            Mood::Happy => "#89E780",
            Mood::VeryHappy => "#FFC97C",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

// The API has been seen returning the mood both as a number and as a
// numeric string.
impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(value) => value,
            Raw::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid mood '{text}'")))?,
        };
        Mood::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SleepRange {
    ZeroToTwo,
    ThreeToFour,
    FiveToSix,
    SevenToEight,
    NinePlus,
}

impl SleepRange {
    pub const ALL: [SleepRange; 5] = [
        SleepRange::ZeroToTwo,
        SleepRange::ThreeToFour,
        SleepRange::FiveToSix,
        SleepRange::SevenToEight,
        SleepRange::NinePlus,
    ];

    /// Position on the chart's y-axis, lowest bucket first.
    pub fn ordinal(self) -> u8 {
        match self {
            SleepRange::ZeroToTwo => 1,
            SleepRange::ThreeToFour => 2,
            SleepRange::FiveToSix => 3,
            SleepRange::SevenToEight => 4,
            SleepRange::NinePlus => 5,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self, DomainError> {
        match ordinal {
            1 => Ok(SleepRange::ZeroToTwo),
            2 => Ok(SleepRange::ThreeToFour),
            3 => Ok(SleepRange::FiveToSix),
            4 => Ok(SleepRange::SevenToEight),
            5 => Ok(SleepRange::NinePlus),
            other => Err(DomainError::SleepOrdinalOutOfRange(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SleepRange::ZeroToTwo => "0 - 2",
            SleepRange::ThreeToFour => "3 - 4",
            SleepRange::FiveToSix => "5 - 6",
            SleepRange::SevenToEight => "7 - 8",
            SleepRange::NinePlus => "+9",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SleepRange::ZeroToTwo => "#ec4899",
            SleepRange::ThreeToFour => "#a855f7",
            SleepRange::FiveToSix => "#3b82f6",
            SleepRange::SevenToEight => "#22c55e",
            SleepRange::NinePlus => "#eab308",
        }
    }
}

impl FromStr for SleepRange {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            // older entries were stored without spaces around the dash
            "0 - 2" | "0-2" => Ok(SleepRange::ZeroToTwo),
            "3 - 4" | "3-4" => Ok(SleepRange::ThreeToFour),
            "5 - 6" | "5-6" => Ok(SleepRange::FiveToSix),
            "7 - 8" | "7-8" => Ok(SleepRange::SevenToEight),
            "+9" => Ok(SleepRange::NinePlus),
            other => Err(DomainError::UnknownSleepRange(other.to_string())),
        }
    }
}

impl fmt::Display for SleepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SleepRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SleepRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Tags offered by the feelings step, in display order.
pub const FEELINGS: [&str; 19] = [
    "joyful",
    "down",
    "anxious",
    "calm",
    "excited",
    "frustrated",
    "lonely",
    "stressed",
    "overwhelmed",
    "grateful",
    "motivated",
    "hopeful",
    "peaceful",
    "content",
    "relaxed",
    "energetic",
    "exhausted",
    "disappointed",
    "optimistic",
];

pub fn validate_feeling(tag: &str) -> Result<&'static str, DomainError> {
    let tag = tag.trim();
    FEELINGS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(tag))
        .ok_or_else(|| DomainError::UnknownFeeling(tag.to_string()))
}

/// `#Joyful #Calm` style rendering used under the journal entry.
pub fn hashtags(feelings: &[String]) -> String {
    feelings
        .iter()
        .map(|feeling| {
            let mut chars = feeling.chars();
            match chars.next() {
                Some(first) => format!("#{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

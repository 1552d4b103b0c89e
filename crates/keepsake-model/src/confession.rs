use std::fmt;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result};

/// A confession that was sent by the roulette.
///
/// Only sent confessions are ever stored; discarded ones turn into points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confession {
    pub confession: String,
    pub sent: bool,
    /// Older documents store the percent as a string (`"30"`).
    #[serde(deserialize_with = "percent_from_number_or_text")]
    pub probability: u8,
    pub date: String,
}

impl Confession {
    pub fn sent(text: impl Into<String>, probability: Probability, date: impl Into<String>) -> Self {
        Self {
            confession: text.into(),
            sent: true,
            probability: probability.percent(),
            date: date.into(),
        }
    }
}

fn percent_from_number_or_text<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Percent {
        Number(u8),
        Text(String),
    }

    match Percent::deserialize(deserializer)? {
        Percent::Number(percent) => Ok(percent),
        Percent::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&text), &"a percentage")),
    }
}

/// Send probability of the confession roulette, in percent.
///
/// Restricted to 10, 20, 30, 40 and 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Probability(u8);

impl Probability {
    pub const MIN: Probability = Probability(10);
    pub const MAX: Probability = Probability(50);
    pub const STEP: u8 = 10;

    pub fn new(percent: i64) -> Result<Self> {
        if (10..=50).contains(&percent) && percent % i64::from(Self::STEP) == 0 {
            // Range checked above.
            Ok(Self(percent as u8))
        } else {
            Err(ModelError::InvalidProbability(percent))
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Points awarded when a confession is discarded at this probability.
    pub fn points(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// All selectable values, lowest first.
    pub fn all() -> impl Iterator<Item = Probability> {
        (1..=5).map(|step| Probability(step * Self::STEP))
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self(30)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_accepts_steps_only() {
        assert!(Probability::new(10).is_ok());
        assert!(Probability::new(50).is_ok());
        assert_eq!(Probability::new(35), Err(ModelError::InvalidProbability(35)));
        assert_eq!(Probability::new(0), Err(ModelError::InvalidProbability(0)));
        assert_eq!(Probability::new(60), Err(ModelError::InvalidProbability(60)));
    }

    #[test]
    fn probability_reads_numbers_and_numeric_text() {
        let stored: Confession = serde_json::from_str(
            r#"{"confession":"hi","sent":true,"probability":"30","date":"1/2/2024"}"#,
        )
        .unwrap();
        assert_eq!(stored.probability, 30);

        let stored: Confession = serde_json::from_str(
            r#"{"confession":"hi","sent":true,"probability":40,"date":"1/2/2024"}"#,
        )
        .unwrap();
        assert_eq!(stored.probability, 40);

        let rejected = serde_json::from_str::<Confession>(
            r#"{"confession":"hi","sent":true,"probability":"lots","date":"1/2/2024"}"#,
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn points_are_a_tenth_of_the_percent() {
        assert_eq!(Probability::default().points(), 3.0);
        assert_eq!(Probability::MIN.points(), 1.0);
        assert_eq!(Probability::MAX.points(), 5.0);
        assert_eq!(Probability::all().count(), 5);
    }
}

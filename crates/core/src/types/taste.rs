//! Taste intensity scores.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`TasteScore`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TasteScoreError {
    /// The value is outside the 1-10 scale.
    #[error("taste score must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: i64,
        /// Lowest allowed score.
        min: u8,
        /// Highest allowed score.
        max: u8,
    },
}

/// A taste intensity on an integer 1-10 scale.
///
/// ## Examples
///
/// ```
/// use espresso_dialer_core::TasteScore;
///
/// assert!(TasteScore::new(1).is_ok());
/// assert!(TasteScore::new(10).is_ok());
/// assert!(TasteScore::new(0).is_err());
/// assert!(TasteScore::new(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct TasteScore(u8);

impl TasteScore {
    /// Lowest score on the scale.
    pub const MIN: u8 = 1;
    /// Highest score on the scale.
    pub const MAX: u8 = 10;
    /// Score the shot form starts from.
    pub const DEFAULT: Self = Self(5);

    /// Build a score, rejecting values outside 1-10.
    ///
    /// # Errors
    ///
    /// Returns [`TasteScoreError::OutOfRange`] when `value` is not in 1-10.
    pub fn new(value: i64) -> Result<Self, TasteScoreError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(TasteScoreError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// The raw score.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for TasteScore {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for TasteScore {
    type Error = TasteScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TasteScore> for u8 {
    fn from(score: TasteScore) -> Self {
        score.0
    }
}

impl fmt::Display for TasteScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four rated taste dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TasteDimension {
    Acidity,
    Bitterness,
    Sweetness,
    Fruitiness,
}

impl TasteDimension {
    /// All dimensions in display order.
    pub const ALL: [Self; 4] = [
        Self::Acidity,
        Self::Bitterness,
        Self::Sweetness,
        Self::Fruitiness,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Acidity => "Acidity",
            Self::Bitterness => "Bitterness",
            Self::Sweetness => "Sweetness",
            Self::Fruitiness => "Fruitiness",
        }
    }

    /// Lowercase form field name.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Acidity => "acidity",
            Self::Bitterness => "bitterness",
            Self::Sweetness => "sweetness",
            Self::Fruitiness => "fruitiness",
        }
    }
}

/// The four taste ratings of one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tastes {
    pub acidity: TasteScore,
    pub bitterness: TasteScore,
    pub sweetness: TasteScore,
    pub fruitiness: TasteScore,
}

impl Tastes {
    /// Score for a single dimension.
    #[must_use]
    pub const fn get(&self, dimension: TasteDimension) -> TasteScore {
        match dimension {
            TasteDimension::Acidity => self.acidity,
            TasteDimension::Bitterness => self.bitterness,
            TasteDimension::Sweetness => self.sweetness,
            TasteDimension::Fruitiness => self.fruitiness,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_taste_score_bounds() {
        assert_eq!(TasteScore::new(1).unwrap().get(), 1);
        assert_eq!(TasteScore::new(10).unwrap().get(), 10);
        assert!(TasteScore::new(0).is_err());
        assert!(TasteScore::new(-3).is_err());
        assert!(TasteScore::new(300).is_err());
    }

    #[test]
    fn test_taste_score_error_message() {
        let err = TasteScore::new(11).unwrap_err();
        assert_eq!(
            err.to_string(),
            "taste score must be between 1 and 10 (got 11)"
        );
    }

    #[test]
    fn test_default_is_five() {
        let tastes = Tastes::default();
        for dimension in TasteDimension::ALL {
            assert_eq!(tastes.get(dimension).get(), 5);
        }
    }

    #[test]
    fn test_dimension_lookup() {
        let tastes = Tastes {
            acidity: TasteScore::new(2).unwrap(),
            bitterness: TasteScore::new(4).unwrap(),
            sweetness: TasteScore::new(6).unwrap(),
            fruitiness: TasteScore::new(8).unwrap(),
        };
        assert_eq!(tastes.get(TasteDimension::Bitterness).get(), 4);
        assert_eq!(tastes.get(TasteDimension::Fruitiness).get(), 8);
        assert_eq!(TasteDimension::Sweetness.field(), "sweetness");
    }
}

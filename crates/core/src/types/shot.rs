//! Recorded espresso shots.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BeanId, GrinderId, MachineId, ShotId};
use super::taste::Tastes;

/// Brew ratio: grams out per gram in.
///
/// Displays in the conventional `1:X` form with one decimal place.
///
/// ```
/// use espresso_dialer_core::BrewRatio;
///
/// assert_eq!(BrewRatio::new(18.0, 36.0).to_string(), "1:2.0");
/// assert_eq!(BrewRatio::from_value(2.34).to_string(), "1:2.3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrewRatio(f64);

impl BrewRatio {
    /// `yield_out / dose_in`. A zero dose yields an infinite or NaN ratio.
    #[must_use]
    pub fn new(dose_in: f64, yield_out: f64) -> Self {
        Self(yield_out / dose_in)
    }

    /// Wrap an already computed ratio (e.g. an average).
    #[must_use]
    pub const fn from_value(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for BrewRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{:.1}", self.0)
    }
}

/// One espresso extraction.
///
/// References to the bean and equipment are plain IDs. They may dangle once
/// the referenced entity is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: ShotId,
    pub bean_id: BeanId,
    pub grinder_id: GrinderId,
    pub machine_id: MachineId,
    pub grind_size: f64,
    /// Seconds.
    pub shot_time: f64,
    /// Grams of ground coffee in the basket.
    pub dose_in: f64,
    /// Grams of espresso in the cup.
    pub yield_out: f64,
    /// Brew temperature in °C.
    pub temperature: Option<f64>,
    pub tastes: Tastes,
    pub created_at: DateTime<Utc>,
}

impl Shot {
    /// Default grind size offered by the shot form.
    pub const DEFAULT_GRIND_SIZE: f64 = 5.0;
    pub const DEFAULT_SHOT_TIME: f64 = 25.0;
    pub const DEFAULT_YIELD_OUT: f64 = 36.0;
    pub const DEFAULT_DOSE_IN: f64 = 18.0;
    pub const DEFAULT_TEMPERATURE: f64 = 93.0;

    #[must_use]
    pub fn ratio(&self) -> BrewRatio {
        BrewRatio::new(self.dose_in, self.yield_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_yield_over_dose() {
        let ratio = BrewRatio::new(18.0, 36.0);
        assert!((ratio.value() - 2.0).abs() < f64::EPSILON);
        assert_eq!(ratio.to_string(), "1:2.0");
    }

    #[test]
    fn test_ratio_display_rounds_to_one_decimal() {
        assert_eq!(BrewRatio::new(18.0, 40.0).to_string(), "1:2.2");
        assert_eq!(BrewRatio::new(20.0, 46.0).to_string(), "1:2.3");
    }

    #[test]
    fn test_zero_dose_is_not_finite() {
        assert!(!BrewRatio::new(0.0, 36.0).value().is_finite());
    }
}

//! Grinders and espresso machines.

use serde::{Deserialize, Serialize};

use super::category::MachineType;
use super::id::{GrinderId, MachineId};

/// Error returned when a grinder's range is unusable.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum GrindRangeError {
    /// A bound is `NaN` or infinite.
    #[error("grind settings must be finite numbers (got {min} - {max})")]
    NonFinite { min: f64, max: f64 },

    /// The minimum is above the maximum.
    #[error("minimum grind setting {min} exceeds maximum {max}")]
    Inverted { min: f64, max: f64 },
}

/// A grinder with an adjustable coarseness range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grinder {
    pub id: GrinderId,
    pub name: String,
    pub brand: String,
    pub min_grind_setting: f64,
    pub max_grind_setting: f64,
}

impl Grinder {
    /// Default lower bound offered by the grinder form.
    pub const DEFAULT_MIN_SETTING: f64 = 1.0;
    /// Default upper bound offered by the grinder form.
    pub const DEFAULT_MAX_SETTING: f64 = 10.0;

    /// Create a grinder, checking that both bounds are finite and
    /// `min_grind_setting <= max_grind_setting`.
    ///
    /// The range is only checked here. A grinder already in the store is
    /// never re-validated.
    ///
    /// # Errors
    ///
    /// Returns [`GrindRangeError`] for a non-finite bound or when the minimum
    /// exceeds the maximum.
    pub fn new(
        id: GrinderId,
        name: impl Into<String>,
        brand: impl Into<String>,
        min_grind_setting: f64,
        max_grind_setting: f64,
    ) -> Result<Self, GrindRangeError> {
        let (min, max) = (min_grind_setting, max_grind_setting);
        if !min.is_finite() || !max.is_finite() {
            return Err(GrindRangeError::NonFinite { min, max });
        }
        if min > max {
            return Err(GrindRangeError::Inverted { min, max });
        }

        Ok(Self {
            id,
            name: name.into(),
            brand: brand.into(),
            min_grind_setting,
            max_grind_setting,
        })
    }

    /// Clamp a finite grind setting into this grinder's range.
    #[must_use]
    pub fn clamp_setting(&self, setting: f64) -> f64 {
        setting.max(self.min_grind_setting).min(self.max_grind_setting)
    }

    /// "1.0 - 11.0" style range label.
    #[must_use]
    pub fn range_label(&self) -> String {
        format!(
            "{:.1} - {:.1}",
            self.min_grind_setting, self.max_grind_setting
        )
    }
}

/// An espresso machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub brand: String,
    pub machine_type: MachineType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_grinder_new_accepts_equal_bounds() {
        let grinder = Grinder::new(GrinderId::new(1), "Niche Zero", "Niche", 5.0, 5.0).unwrap();
        assert_eq!(grinder.range_label(), "5.0 - 5.0");
    }

    #[test]
    fn test_grinder_new_rejects_inverted_range() {
        let err = Grinder::new(GrinderId::new(1), "Backwards", "Acme", 11.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "minimum grind setting 11 exceeds maximum 1");
    }

    #[test]
    fn test_grinder_new_rejects_nan_bounds() {
        let err = Grinder::new(GrinderId::new(1), "X", "Y", f64::NAN, 5.0).unwrap_err();
        assert!(matches!(err, GrindRangeError::NonFinite { max, .. } if (max - 5.0).abs() < f64::EPSILON));

        let err = Grinder::new(GrinderId::new(1), "X", "Y", 5.0, f64::NAN).unwrap_err();
        assert!(matches!(err, GrindRangeError::NonFinite { min, .. } if (min - 5.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_grinder_new_rejects_infinite_bounds() {
        let err = Grinder::new(GrinderId::new(1), "X", "Y", 1.0, f64::INFINITY).unwrap_err();
        assert_eq!(
            err.to_string(),
            "grind settings must be finite numbers (got 1 - inf)"
        );
    }

    #[test]
    fn test_clamp_setting() {
        let grinder = Grinder::new(GrinderId::new(1), "Niche Zero", "Niche", 1.0, 11.0).unwrap();
        assert!((grinder.clamp_setting(0.2) - 1.0).abs() < f64::EPSILON);
        assert!((grinder.clamp_setting(12.0) - 11.0).abs() < f64::EPSILON);
        assert!((grinder.clamp_setting(4.5) - 4.5).abs() < f64::EPSILON);
    }
}

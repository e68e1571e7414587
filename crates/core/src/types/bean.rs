//! Coffee bean bags.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::{ProcessType, RoastLevel};
use super::id::BeanId;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// How long ago a bag was roasted, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Up to two weeks off roast.
    Fresh,
    /// Up to a month off roast.
    Aging,
    Stale,
}

impl Freshness {
    /// Bucket a day count.
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        if days <= 14 {
            Self::Fresh
        } else if days <= 30 {
            Self::Aging
        } else {
            Self::Stale
        }
    }

    /// CSS modifier for the freshness badge.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Fresh => "badge-fresh",
            Self::Aging => "badge-aging",
            Self::Stale => "badge-stale",
        }
    }
}

/// A registered bag of coffee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bean {
    pub id: BeanId,
    pub roaster: String,
    pub origin: String,
    pub process_type: ProcessType,
    pub roast_date: NaiveDate,
    pub roast_level: RoastLevel,
    pub notes: String,
    /// Last grind setting dialed in for this bag.
    pub grind_setting: Option<f64>,
}

impl Bean {
    /// "Roaster - Origin" label used across lists and selects.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.roaster, self.origin)
    }

    /// A copy of this bean with a new grind setting.
    #[must_use]
    pub fn with_grind_setting(&self, grind_setting: f64) -> Self {
        Self {
            grind_setting: Some(grind_setting),
            ..self.clone()
        }
    }

    /// Whole days between the roast date and `now`, rounded up.
    ///
    /// The roast date counts from midnight UTC. The distance is absolute, so
    /// a roast date in the future still yields a positive count.
    #[must_use]
    pub fn days_since_roast(&self, now: DateTime<Utc>) -> i64 {
        let roasted = self.roast_date.and_hms_opt(0, 0, 0).map_or_else(
            || now.timestamp_millis(),
            |midnight| midnight.and_utc().timestamp_millis(),
        );
        let diff = (now.timestamp_millis() - roasted).abs();
        (diff + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    /// Freshness bucket at `now`.
    #[must_use]
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        Freshness::from_days(self.days_since_roast(now))
    }
}

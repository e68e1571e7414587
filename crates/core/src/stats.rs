//! Shot statistics grouped by equipment pairing.
//!
//! Everything here is recomputed from scratch on each call; nothing is cached
//! between requests. Averages are plain arithmetic means, and an empty set of
//! shots produces `None` rather than zeros or NaN.

use std::collections::HashMap;

use serde::Serialize;

use crate::store::TrackerState;
use crate::types::{BrewRatio, Grinder, GrinderId, Machine, MachineId, Shot, TasteDimension};

/// Label shown for a bean or piece of equipment that no longer exists.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of shots listed under each pairing.
pub const RECENT_SHOTS_PER_GROUP: usize = 5;

/// Grouping key: the ordered (grinder, machine) pair a shot was pulled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EquipmentKey {
    pub grinder_id: GrinderId,
    pub machine_id: MachineId,
}

impl EquipmentKey {
    #[must_use]
    pub const fn of(shot: &Shot) -> Self {
        Self {
            grinder_id: shot.grinder_id,
            machine_id: shot.machine_id,
        }
    }
}

/// Summary metrics over a set of shots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShotSummary {
    /// Mean of per-shot `yield_out / dose_in`.
    pub avg_ratio: f64,
    pub avg_time: f64,
    pub avg_grind_size: f64,
    pub avg_yield: f64,
    pub avg_dose: f64,
    pub shot_count: usize,
}

impl ShotSummary {
    /// Summarize `shots`, or `None` when there are none.
    pub fn from_shots<'a, I>(shots: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Shot>,
    {
        let mut count = 0usize;
        let mut ratio = 0.0;
        let mut time = 0.0;
        let mut grind = 0.0;
        let mut yield_out = 0.0;
        let mut dose = 0.0;

        for shot in shots {
            count += 1;
            ratio += shot.ratio().value();
            time += shot.shot_time;
            grind += shot.grind_size;
            yield_out += shot.yield_out;
            dose += shot.dose_in;
        }

        if count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)] // shot counts never approach 2^52
        let n = count as f64;
        Some(Self {
            avg_ratio: ratio / n,
            avg_time: time / n,
            avg_grind_size: grind / n,
            avg_yield: yield_out / n,
            avg_dose: dose / n,
            shot_count: count,
        })
    }

    /// The average ratio in `1:X` form.
    #[must_use]
    pub const fn ratio(&self) -> BrewRatio {
        BrewRatio::from_value(self.avg_ratio)
    }
}

/// One point of the per-pairing progression series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressionPoint {
    /// 1-based position within the group, in recording order.
    pub shot_number: usize,
    pub time: f64,
    pub grind_size: f64,
    pub ratio: f64,
}

/// Chart series for a set of shots, in recording order.
pub fn progression<'a, I>(shots: I) -> Vec<ProgressionPoint>
where
    I: IntoIterator<Item = &'a Shot>,
{
    shots
        .into_iter()
        .enumerate()
        .map(|(index, shot)| ProgressionPoint {
            shot_number: index + 1,
            time: shot.shot_time,
            grind_size: shot.grind_size,
            ratio: shot.ratio().value(),
        })
        .collect()
}

/// Mean score per taste dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TasteProfile {
    pub acidity: f64,
    pub bitterness: f64,
    pub sweetness: f64,
    pub fruitiness: f64,
}

impl TasteProfile {
    /// Average taste profile of `shots`, or `None` when there are none.
    pub fn from_shots<'a, I>(shots: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Shot>,
    {
        let mut count = 0u32;
        let mut totals = [0u32; 4];

        for shot in shots {
            count += 1;
            for (total, dimension) in totals.iter_mut().zip(TasteDimension::ALL) {
                *total += u32::from(shot.tastes.get(dimension).get());
            }
        }

        if count == 0 {
            return None;
        }

        let [acidity, bitterness, sweetness, fruitiness] =
            totals.map(|total| f64::from(total) / f64::from(count));
        Some(Self {
            acidity,
            bitterness,
            sweetness,
            fruitiness,
        })
    }

    /// Mean for a single dimension.
    #[must_use]
    pub const fn get(&self, dimension: TasteDimension) -> f64 {
        match dimension {
            TasteDimension::Acidity => self.acidity,
            TasteDimension::Bitterness => self.bitterness,
            TasteDimension::Sweetness => self.sweetness,
            TasteDimension::Fruitiness => self.fruitiness,
        }
    }

    /// `(dimension, mean)` pairs in display order.
    #[must_use]
    pub fn entries(&self) -> [(TasteDimension, f64); 4] {
        TasteDimension::ALL.map(|dimension| (dimension, self.get(dimension)))
    }
}

/// Shots sharing one equipment pairing, with the pairing's equipment resolved.
#[derive(Debug, Clone)]
pub struct EquipmentGroup<'a> {
    pub key: EquipmentKey,
    /// `None` when the grinder has been deleted.
    pub grinder: Option<&'a Grinder>,
    /// `None` when the machine has been deleted.
    pub machine: Option<&'a Machine>,
    /// In recording order.
    pub shots: Vec<&'a Shot>,
}

impl<'a> EquipmentGroup<'a> {
    #[must_use]
    pub fn grinder_name(&self) -> &'a str {
        self.grinder.map_or(UNKNOWN_LABEL, |g| g.name.as_str())
    }

    #[must_use]
    pub fn machine_name(&self) -> &'a str {
        self.machine.map_or(UNKNOWN_LABEL, |m| m.name.as_str())
    }

    /// "Grinder + Machine" heading.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} + {}", self.grinder_name(), self.machine_name())
    }

    #[must_use]
    pub fn summary(&self) -> Option<ShotSummary> {
        ShotSummary::from_shots(self.shots.iter().copied())
    }

    #[must_use]
    pub fn progression(&self) -> Vec<ProgressionPoint> {
        progression(self.shots.iter().copied())
    }

    #[must_use]
    pub fn taste_profile(&self) -> Option<TasteProfile> {
        TasteProfile::from_shots(self.shots.iter().copied())
    }

    /// The group's last few shots, most recent first.
    #[must_use]
    pub fn recent_shots(&self) -> Vec<&'a Shot> {
        self.shots
            .iter()
            .rev()
            .take(RECENT_SHOTS_PER_GROUP)
            .copied()
            .collect()
    }
}

/// Partition the state's shots by equipment pairing.
///
/// Groups appear in the order their first shot was recorded. Shots whose
/// grinder or machine has been deleted stay in the group for their original
/// IDs; the missing side resolves to `None`.
#[must_use]
pub fn group_by_equipment(state: &TrackerState) -> Vec<EquipmentGroup<'_>> {
    let mut index: HashMap<EquipmentKey, usize> = HashMap::new();
    let mut groups: Vec<EquipmentGroup<'_>> = Vec::new();

    for shot in &state.shots {
        let key = EquipmentKey::of(shot);
        if let Some(&position) = index.get(&key) {
            if let Some(group) = groups.get_mut(position) {
                group.shots.push(shot);
            }
        } else {
            index.insert(key, groups.len());
            groups.push(EquipmentGroup {
                key,
                grinder: state.grinder(key.grinder_id),
                machine: state.machine(key.machine_id),
                shots: vec![shot],
            });
        }
    }

    groups
}

/// Dashboard figures over every recorded shot.
#[must_use]
pub fn overall_summary(state: &TrackerState) -> Option<ShotSummary> {
    ShotSummary::from_shots(&state.shots)
}

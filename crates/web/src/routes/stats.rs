//! Per-pairing statistics route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use espresso_dialer_core::TrackerState;
use espresso_dialer_core::stats::{
    EquipmentGroup, ShotSummary, UNKNOWN_LABEL, group_by_equipment,
};
use tracing::instrument;

use super::{one_decimal, render};
use crate::charts::{LineChart, ScatterChart, TasteBar, taste_bars};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Summary metrics formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub shot_count: usize,
    pub avg_ratio: String,
    pub avg_time: String,
    pub avg_grind_size: String,
    pub avg_yield: String,
    pub avg_dose: String,
}

impl From<&ShotSummary> for SummaryView {
    fn from(summary: &ShotSummary) -> Self {
        Self {
            shot_count: summary.shot_count,
            avg_ratio: summary.ratio().to_string(),
            avg_time: one_decimal(summary.avg_time),
            avg_grind_size: one_decimal(summary.avg_grind_size),
            avg_yield: one_decimal(summary.avg_yield),
            avg_dose: one_decimal(summary.avg_dose),
        }
    }
}

/// One row of a pairing's recent shots table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentShotView {
    pub bean_label: String,
    pub grind_size: String,
    pub shot_time: String,
    pub ratio: String,
}

/// Stats card for one grinder + machine pairing.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub title: String,
    pub summary: SummaryView,
    pub scatter: ScatterChart,
    pub progression: LineChart,
    pub tastes: Vec<TasteBar>,
    pub recent: Vec<RecentShotView>,
}

impl GroupView {
    /// `None` for a group without shots.
    fn new(group: &EquipmentGroup<'_>, state: &TrackerState) -> Option<Self> {
        let summary = group.summary()?;
        let profile = group.taste_profile()?;

        let recent = group
            .recent_shots()
            .into_iter()
            .map(|shot| RecentShotView {
                bean_label: state
                    .bean(shot.bean_id)
                    .map_or_else(|| UNKNOWN_LABEL.to_string(), |b| b.label()),
                grind_size: one_decimal(shot.grind_size),
                shot_time: shot.shot_time.to_string(),
                ratio: shot.ratio().to_string(),
            })
            .collect();

        Some(Self {
            title: group.title(),
            summary: SummaryView::from(&summary),
            scatter: ScatterChart::grind_vs_time(&group.shots),
            progression: LineChart::progression(&group.progression()),
            tastes: taste_bars(&profile),
            recent,
        })
    }
}

/// Stats page template.
#[derive(Template)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub current_path: &'static str,
    /// Empty when no shots are recorded.
    pub groups: Vec<GroupView>,
}

impl StatsTemplate {
    #[must_use]
    pub fn new(state: &TrackerState) -> Self {
        Self {
            current_path: "/stats",
            groups: group_by_equipment(state)
                .iter()
                .filter_map(|group| GroupView::new(group, state))
                .collect(),
        }
    }
}

/// Stats page handler.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Html<String>> {
    let snapshot = state.store().snapshot().await;
    render(&StatsTemplate::new(&snapshot))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::DateTime;
    use espresso_dialer_core::{
        Action, BeanId, Grinder, GrinderId, Machine, MachineId, MachineType, Shot, ShotId, Tastes,
    };

    use super::*;

    fn shot(id: i64, grinder: i64, machine: i64, yield_out: f64) -> Shot {
        Shot {
            id: ShotId::new(id),
            bean_id: BeanId::new(1),
            grinder_id: GrinderId::new(grinder),
            machine_id: MachineId::new(machine),
            grind_size: 5.0,
            shot_time: 28.0,
            dose_in: 18.0,
            yield_out,
            temperature: Some(93.0),
            tastes: Tastes::default(),
            created_at: DateTime::from_timestamp_millis(id).unwrap(),
        }
    }

    fn equipment() -> TrackerState {
        let grinder = Grinder::new(GrinderId::new(1), "Niche Zero", "Niche", 1.0, 50.0).unwrap();
        let machine = Machine {
            id: MachineId::new(2),
            name: "Linea Micra".to_string(),
            brand: "La Marzocco".to_string(),
            machine_type: MachineType::SemiAutomatic,
        };
        TrackerState::new()
            .reduce(Action::AddGrinder(grinder))
            .reduce(Action::AddMachine(machine))
    }

    #[test]
    fn test_empty_state_has_no_groups() {
        assert!(StatsTemplate::new(&TrackerState::new()).groups.is_empty());
        let html = StatsTemplate::new(&TrackerState::new()).render().unwrap();
        assert!(html.contains("No data available"));
    }

    #[test]
    fn test_single_shot_summary() {
        let state = equipment().reduce(Action::AddShot(shot(10, 1, 2, 36.0)));
        let template = StatsTemplate::new(&state);

        assert_eq!(template.groups.len(), 1);
        let group = &template.groups[0];
        assert_eq!(group.title, "Niche Zero + Linea Micra");
        assert_eq!(group.summary.avg_ratio, "1:2.0");
        assert_eq!(group.summary.avg_time, "28.0");
        assert_eq!(group.summary.shot_count, 1);
        assert_eq!(group.recent[0].bean_label, "Unknown");
    }

    #[test]
    fn test_deleted_grinder_shows_unknown() {
        let state = equipment()
            .reduce(Action::AddShot(shot(10, 1, 2, 36.0)))
            .reduce(Action::DeleteGrinder(GrinderId::new(1)));
        let template = StatsTemplate::new(&state);
        assert_eq!(template.groups[0].title, "Unknown + Linea Micra");
    }

    #[test]
    fn test_recent_shots_most_recent_first() {
        let mut state = equipment();
        for i in 0..7_i32 {
            let shot = shot(10 + i64::from(i), 1, 2, 36.0 + f64::from(i));
            state = state.reduce(Action::AddShot(shot));
        }
        let template = StatsTemplate::new(&state);
        let recent = &template.groups[0].recent;
        assert_eq!(recent.len(), 5);
        // 42 / 18
        assert_eq!(recent[0].ratio, "1:2.3");
        // 38 / 18
        assert_eq!(recent[4].ratio, "1:2.1");
    }

    #[test]
    fn test_renders_group_card() {
        let state = equipment()
            .reduce(Action::AddShot(shot(10, 1, 2, 36.0)))
            .reduce(Action::AddShot(shot(11, 1, 2, 40.0)));
        let html = StatsTemplate::new(&state).render().unwrap();
        assert!(html.contains("Niche Zero + Linea Micra"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("Acidity"));
    }
}

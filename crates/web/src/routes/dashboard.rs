//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use espresso_dialer_core::TrackerState;
use espresso_dialer_core::stats::overall_summary;
use tracing::instrument;

use super::shots::ShotView;
use super::{one_decimal, render};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Shots listed under "Recent Shots".
pub const RECENT_SHOT_LIMIT: usize = 5;

/// Which getting-started message to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// No grinders and no machines yet.
    NoEquipment,
    /// Equipment is registered but there are no beans.
    NeedsBeans,
    /// Everything is registered; no shot recorded yet.
    NeedsFirstShot,
    /// At least one shot exists.
    Complete,
    /// Partially registered equipment; no message.
    Incomplete,
}

impl SetupStage {
    #[must_use]
    pub fn of(state: &TrackerState) -> Self {
        let has_grinders = !state.grinders.is_empty();
        let has_machines = !state.machines.is_empty();

        if !state.shots.is_empty() {
            Self::Complete
        } else if !has_grinders && !has_machines {
            Self::NoEquipment
        } else if has_grinders && has_machines && state.beans.is_empty() {
            Self::NeedsBeans
        } else if has_grinders && has_machines {
            Self::NeedsFirstShot
        } else {
            Self::Incomplete
        }
    }
}

/// Average performance across every shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AveragesView {
    pub time: String,
    pub ratio: String,
    pub grind_size: String,
}

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: &'static str,
    pub shot_count: usize,
    pub bean_count: usize,
    pub grinder_count: usize,
    pub machine_count: usize,
    /// `None` until a shot is recorded.
    pub averages: Option<AveragesView>,
    pub stage: SetupStage,
    /// Most recent first.
    pub recent_shots: Vec<ShotView>,
}

impl DashboardTemplate {
    #[must_use]
    pub fn new(state: &TrackerState) -> Self {
        Self {
            current_path: "/",
            shot_count: state.shots.len(),
            bean_count: state.beans.len(),
            grinder_count: state.grinders.len(),
            machine_count: state.machines.len(),
            averages: overall_summary(state).map(|s| AveragesView {
                time: one_decimal(s.avg_time),
                ratio: s.ratio().to_string(),
                grind_size: one_decimal(s.avg_grind_size),
            }),
            stage: SetupStage::of(state),
            recent_shots: state
                .recent_shots(RECENT_SHOT_LIMIT)
                .into_iter()
                .map(|shot| ShotView::new(shot, state))
                .collect(),
        }
    }
}

/// Dashboard handler.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Html<String>> {
    let snapshot = state.store().snapshot().await;
    render(&DashboardTemplate::new(&snapshot))
}

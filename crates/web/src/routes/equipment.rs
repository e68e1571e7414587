//! Grinder and machine registration route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use espresso_dialer_core::{
    Action, Grinder, GrinderId, Machine, MachineId, MachineType, TrackerState,
};
use serde::Deserialize;
use tracing::instrument;

use super::{SelectOption, one_decimal, render};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Grinder card view for templates.
#[derive(Debug, Clone)]
pub struct GrinderView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub range: String,
}

impl From<&Grinder> for GrinderView {
    fn from(grinder: &Grinder) -> Self {
        Self {
            id: grinder.id.to_string(),
            name: grinder.name.clone(),
            brand: grinder.brand.clone(),
            range: grinder.range_label(),
        }
    }
}

/// Machine card view for templates.
#[derive(Debug, Clone)]
pub struct MachineView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub machine_type: &'static str,
}

impl From<&Machine> for MachineView {
    fn from(machine: &Machine) -> Self {
        Self {
            id: machine.id.to_string(),
            name: machine.name.clone(),
            brand: machine.brand.clone(),
            machine_type: machine.machine_type.label(),
        }
    }
}

/// Equipment page template.
#[derive(Template)]
#[template(path = "equipment.html")]
pub struct EquipmentTemplate {
    pub current_path: &'static str,
    pub grinders: Vec<GrinderView>,
    pub machines: Vec<MachineView>,
    pub machine_types: Vec<SelectOption>,
    pub default_min: String,
    pub default_max: String,
}

impl EquipmentTemplate {
    #[must_use]
    pub fn new(state: &TrackerState) -> Self {
        Self {
            current_path: "/equipment",
            grinders: state.grinders.iter().map(GrinderView::from).collect(),
            machines: state.machines.iter().map(MachineView::from).collect(),
            machine_types: MachineType::ALL
                .iter()
                .map(|t| SelectOption::new(t, t.label(), *t == MachineType::SemiAutomatic))
                .collect(),
            default_min: one_decimal(Grinder::DEFAULT_MIN_SETTING),
            default_max: one_decimal(Grinder::DEFAULT_MAX_SETTING),
        }
    }
}

/// Form input for adding a grinder.
#[derive(Debug, Deserialize)]
pub struct GrinderFormInput {
    pub name: String,
    pub brand: String,
    pub min_grind_setting: f64,
    pub max_grind_setting: f64,
}

/// Form input for adding a machine.
#[derive(Debug, Deserialize)]
pub struct MachineFormInput {
    pub name: String,
    pub brand: String,
    pub machine_type: MachineType,
}

/// Equipment page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let snapshot = state.store().snapshot().await;
    render(&EquipmentTemplate::new(&snapshot))
}

/// Add grinder handler.
///
/// The range is checked once here; an inverted range is a 400 and nothing
/// is stored.
#[instrument(skip(state))]
pub async fn create_grinder(
    State(state): State<AppState>,
    Form(input): Form<GrinderFormInput>,
) -> Result<Redirect> {
    let id = GrinderId::new(state.store().next_id(Utc::now()));
    let grinder = Grinder::new(
        id,
        input.name.trim(),
        input.brand.trim(),
        input.min_grind_setting,
        input.max_grind_setting,
    )?;

    state.store().dispatch(Action::AddGrinder(grinder)).await;
    Ok(Redirect::to("/equipment"))
}

/// Delete grinder handler. Shots keep referring to the deleted id.
#[instrument(skip(state))]
pub async fn delete_grinder(State(state): State<AppState>, Path(id): Path<GrinderId>) -> Redirect {
    state.store().dispatch(Action::DeleteGrinder(id)).await;
    Redirect::to("/equipment")
}

/// Add machine handler.
#[instrument(skip(state))]
pub async fn create_machine(
    State(state): State<AppState>,
    Form(input): Form<MachineFormInput>,
) -> Redirect {
    let machine = Machine {
        id: MachineId::new(state.store().next_id(Utc::now())),
        name: input.name.trim().to_string(),
        brand: input.brand.trim().to_string(),
        machine_type: input.machine_type,
    };

    state.store().dispatch(Action::AddMachine(machine)).await;
    Redirect::to("/equipment")
}

/// Delete machine handler.
#[instrument(skip(state))]
pub async fn delete_machine(State(state): State<AppState>, Path(id): Path<MachineId>) -> Redirect {
    state.store().dispatch(Action::DeleteMachine(id)).await;
    Redirect::to("/equipment")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> TrackerState {
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
    fn test_views() {
        let template = EquipmentTemplate::new(&state());
        assert_eq!(template.grinders[0].range, "1.0 - 50.0");
        assert_eq!(template.machines[0].machine_type, "Semi-automatic");
        assert_eq!(template.default_min, "1.0");
        assert_eq!(template.default_max, "10.0");
    }

    #[test]
    fn test_machine_type_options() {
        let template = EquipmentTemplate::new(&TrackerState::new());
        let labels: Vec<&str> = template
            .machine_types
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(
            labels,
            ["Manual", "Semi-automatic", "Automatic", "Super-automatic"]
        );
        assert!(template.machine_types[1].selected);
    }

    #[test]
    fn test_renders_cards() {
        let html = EquipmentTemplate::new(&state()).render().unwrap();
        assert!(html.contains("Niche Zero"));
        assert!(html.contains("/equipment/grinders/1/delete"));
        assert!(html.contains("/equipment/machines/2/delete"));
    }

    #[test]
    fn test_renders_empty_lists() {
        let html = EquipmentTemplate::new(&TrackerState::new()).render().unwrap();
        assert!(html.contains("No grinders registered"));
        assert!(html.contains("No machines registered"));
    }
}

//! Shot recording and history route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use espresso_dialer_core::intensity::{IntensityScale, Segment};
use espresso_dialer_core::stats::UNKNOWN_LABEL;
use espresso_dialer_core::{
    Action, BeanId, GrinderId, MachineId, Shot, ShotId, TasteDimension, TasteScore, Tastes,
    TrackerState,
};
use serde::Deserialize;
use tracing::instrument;

use super::{SelectOption, empty_string_as_none, one_decimal, render};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Timestamp format on shot cards, e.g. "Mar 4, 09:15 AM".
pub const SHOT_TIMESTAMP_FORMAT: &str = "%b %-d, %I:%M %p";

/// One row of segments in a taste bar.
#[derive(Debug, Clone)]
pub struct TasteMeterView {
    /// Form field name.
    pub field: &'static str,
    pub label: &'static str,
    pub score: u8,
    pub segments: Vec<Segment>,
}

impl TasteMeterView {
    fn new(dimension: TasteDimension, score: TasteScore) -> Self {
        Self {
            field: dimension.field(),
            label: dimension.label(),
            score: score.get(),
            segments: IntensityScale::default().segments(score.get()),
        }
    }

    fn all(tastes: &Tastes) -> Vec<Self> {
        TasteDimension::ALL
            .iter()
            .map(|d| Self::new(*d, tastes.get(*d)))
            .collect()
    }
}

/// Shot card view for templates.
#[derive(Debug, Clone)]
pub struct ShotView {
    pub bean_label: String,
    pub equipment_label: String,
    pub recorded_at: String,
    pub grind_size: String,
    pub shot_time: String,
    pub dose_in: String,
    pub yield_out: String,
    pub ratio: String,
    pub temperature: Option<String>,
    pub tastes: Vec<TasteMeterView>,
}

impl ShotView {
    /// Resolve a shot's references against `state`.
    ///
    /// Deleted beans and equipment show as "Unknown".
    #[must_use]
    pub fn new(shot: &Shot, state: &TrackerState) -> Self {
        let bean_label = state
            .bean(shot.bean_id)
            .map_or_else(|| UNKNOWN_LABEL.to_string(), |b| b.label());
        let grinder = state
            .grinder(shot.grinder_id)
            .map_or(UNKNOWN_LABEL, |g| g.name.as_str());
        let machine = state
            .machine(shot.machine_id)
            .map_or(UNKNOWN_LABEL, |m| m.name.as_str());

        Self {
            bean_label,
            equipment_label: format!("{grinder} + {machine}"),
            recorded_at: shot.created_at.format(SHOT_TIMESTAMP_FORMAT).to_string(),
            grind_size: one_decimal(shot.grind_size),
            shot_time: shot.shot_time.to_string(),
            dose_in: shot.dose_in.to_string(),
            yield_out: shot.yield_out.to_string(),
            ratio: shot.ratio().to_string(),
            temperature: shot.temperature.map(|t| format!("{t}°C")),
            tastes: TasteMeterView::all(&shot.tastes),
        }
    }
}

/// Shot form view with its defaults and select options.
#[derive(Debug, Clone)]
pub struct ShotFormView {
    /// Render the form expanded.
    pub open: bool,
    pub beans: Vec<SelectOption>,
    pub grinders: Vec<SelectOption>,
    pub machines: Vec<SelectOption>,
    pub grind_size: String,
    pub shot_time: String,
    pub dose_in: String,
    pub yield_out: String,
    pub temperature: String,
    pub tastes: Vec<TasteMeterView>,
}

impl ShotFormView {
    /// Form defaults, with `preselect` chosen and its saved grind setting
    /// prefilled when it names an existing bean.
    #[must_use]
    pub fn new(state: &TrackerState, preselect: Option<BeanId>) -> Self {
        let selected = preselect.and_then(|id| state.bean(id));
        let grind_size = selected
            .and_then(|b| b.grind_setting)
            .unwrap_or(Shot::DEFAULT_GRIND_SIZE);

        Self {
            open: selected.is_some(),
            beans: state
                .beans
                .iter()
                .map(|b| SelectOption::new(b.id, b.label(), selected.is_some_and(|s| s.id == b.id)))
                .collect(),
            grinders: state
                .grinders
                .iter()
                .map(|g| SelectOption::new(g.id, format!("{} ({})", g.name, g.range_label()), false))
                .collect(),
            machines: state
                .machines
                .iter()
                .map(|m| SelectOption::new(m.id, m.name.clone(), false))
                .collect(),
            grind_size: one_decimal(grind_size),
            shot_time: Shot::DEFAULT_SHOT_TIME.to_string(),
            dose_in: Shot::DEFAULT_DOSE_IN.to_string(),
            yield_out: Shot::DEFAULT_YIELD_OUT.to_string(),
            temperature: Shot::DEFAULT_TEMPERATURE.to_string(),
            tastes: TasteMeterView::all(&Tastes::default()),
        }
    }

    /// Every select has at least one option.
    #[must_use]
    pub fn ready(&self) -> bool {
        !self.beans.is_empty() && !self.grinders.is_empty() && !self.machines.is_empty()
    }
}

/// Shots page template.
#[derive(Template)]
#[template(path = "shots.html")]
pub struct ShotsTemplate {
    pub current_path: &'static str,
    pub form: ShotFormView,
    /// Recording order.
    pub shots: Vec<ShotView>,
}

impl ShotsTemplate {
    #[must_use]
    pub fn new(state: &TrackerState, preselect: Option<BeanId>) -> Self {
        Self {
            current_path: "/shots",
            form: ShotFormView::new(state, preselect),
            shots: state.shots.iter().map(|s| ShotView::new(s, state)).collect(),
        }
    }
}

/// Shots page query parameters.
#[derive(Debug, Deserialize)]
pub struct ShotsQuery {
    /// Bean to preselect, from a bean card's "Record Shot" link.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub bean: Option<BeanId>,
}

/// Form input for recording a shot.
#[derive(Debug, Deserialize)]
pub struct ShotFormInput {
    pub bean_id: BeanId,
    pub grinder_id: GrinderId,
    pub machine_id: MachineId,
    pub grind_size: f64,
    pub shot_time: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub temperature: Option<f64>,
    pub dose_in: f64,
    pub yield_out: f64,
    #[serde(default)]
    pub acidity: TasteScore,
    #[serde(default)]
    pub bitterness: TasteScore,
    #[serde(default)]
    pub sweetness: TasteScore,
    #[serde(default)]
    pub fruitiness: TasteScore,
}

impl ShotFormInput {
    /// Reject amounts the ratio and averages cannot use: a dose must be
    /// positive and every number finite.
    fn check(&self) -> Result<()> {
        let measurements = [
            ("grind size", self.grind_size),
            ("shot time", self.shot_time),
            ("dose", self.dose_in),
            ("yield", self.yield_out),
        ];
        if let Some((name, _)) = measurements.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AppError::BadRequest(format!("{name} must be a finite number")));
        }
        if self.temperature.is_some_and(|t| !t.is_finite()) {
            return Err(AppError::BadRequest(
                "temperature must be a finite number".to_string(),
            ));
        }
        if self.dose_in <= 0.0 {
            return Err(AppError::BadRequest("dose must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Shots page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShotsQuery>,
) -> Result<Html<String>> {
    let snapshot = state.store().snapshot().await;
    render(&ShotsTemplate::new(&snapshot, query.bean))
}

/// Record shot handler.
///
/// References are stored as submitted; they are not checked against the
/// current equipment and beans.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<ShotFormInput>,
) -> Result<Redirect> {
    input.check()?;

    let now = Utc::now();
    let shot = Shot {
        id: ShotId::new(state.store().next_id(now)),
        bean_id: input.bean_id,
        grinder_id: input.grinder_id,
        machine_id: input.machine_id,
        grind_size: input.grind_size,
        shot_time: input.shot_time,
        dose_in: input.dose_in,
        yield_out: input.yield_out,
        temperature: input.temperature,
        tastes: Tastes {
            acidity: input.acidity,
            bitterness: input.bitterness,
            sweetness: input.sweetness,
            fruitiness: input.fruitiness,
        },
        created_at: now,
    };

    state.store().dispatch(Action::AddShot(shot)).await;
    Ok(Redirect::to("/shots"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use espresso_dialer_core::{Bean, Grinder, Machine, MachineType, ProcessType, RoastLevel};

    use super::*;

    fn state() -> TrackerState {
        let grinder = Grinder::new(GrinderId::new(1), "Niche Zero", "Niche", 1.0, 50.0).unwrap();
        let machine = Machine {
            id: MachineId::new(2),
            name: "Linea Micra".to_string(),
            brand: "La Marzocco".to_string(),
            machine_type: MachineType::SemiAutomatic,
        };
        let bean = Bean {
            id: BeanId::new(3),
            roaster: "Sey".to_string(),
            origin: "Kenya".to_string(),
            process_type: ProcessType::Washed,
            roast_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            roast_level: RoastLevel::Light,
            notes: String::new(),
            grind_setting: Some(12.0),
        };
        TrackerState::new()
            .reduce(Action::AddGrinder(grinder))
            .reduce(Action::AddMachine(machine))
            .reduce(Action::AddBean(bean))
    }

    fn shot(temperature: Option<f64>) -> Shot {
        Shot {
            id: ShotId::new(10),
            bean_id: BeanId::new(3),
            grinder_id: GrinderId::new(1),
            machine_id: MachineId::new(2),
            grind_size: 12.0,
            shot_time: 28.0,
            dose_in: 18.0,
            yield_out: 36.0,
            temperature,
            tastes: Tastes {
                acidity: TasteScore::new(7).unwrap(),
                ..Tastes::default()
            },
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 21, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_shot_view_formatting() {
        let view = ShotView::new(&shot(Some(93.0)), &state());
        assert_eq!(view.bean_label, "Sey - Kenya");
        assert_eq!(view.equipment_label, "Niche Zero + Linea Micra");
        assert_eq!(view.recorded_at, "Mar 4, 09:05 PM");
        assert_eq!(view.grind_size, "12.0");
        assert_eq!(view.shot_time, "28");
        assert_eq!(view.ratio, "1:2.0");
        assert_eq!(view.temperature.as_deref(), Some("93°C"));
        assert_eq!(view.tastes[0].label, "Acidity");
        assert_eq!(view.tastes[0].score, 7);
        assert!(view.tastes[0].segments[6].selected);
    }

    #[test]
    fn test_shot_view_unknown_references() {
        let state = state()
            .reduce(Action::DeleteGrinder(GrinderId::new(1)))
            .reduce(Action::DeleteBean(BeanId::new(3)));
        let view = ShotView::new(&shot(None), &state);
        assert_eq!(view.bean_label, "Unknown");
        assert_eq!(view.equipment_label, "Unknown + Linea Micra");
        assert!(view.temperature.is_none());
    }

    #[test]
    fn test_form_defaults() {
        let form = ShotFormView::new(&state(), None);
        assert!(!form.open);
        assert!(form.ready());
        assert_eq!(form.grind_size, "5.0");
        assert_eq!(form.shot_time, "25");
        assert_eq!(form.dose_in, "18");
        assert_eq!(form.yield_out, "36");
        assert_eq!(form.temperature, "93");
        assert!(form.tastes.iter().all(|t| t.score == 5));
        assert!(form.beans.iter().all(|b| !b.selected));
    }

    #[test]
    fn test_form_preselects_bean() {
        let form = ShotFormView::new(&state(), Some(BeanId::new(3)));
        assert!(form.open);
        assert!(form.beans[0].selected);
        assert_eq!(form.grind_size, "12.0");
    }

    #[test]
    fn test_form_ignores_unknown_preselect() {
        let form = ShotFormView::new(&state(), Some(BeanId::new(99)));
        assert!(!form.open);
        assert_eq!(form.grind_size, "5.0");
    }

    #[test]
    fn test_form_not_ready_without_equipment() {
        assert!(!ShotFormView::new(&TrackerState::new(), None).ready());
    }

    #[test]
    fn test_renders_history_in_recording_order() {
        let mut later = shot(None);
        later.id = ShotId::new(11);
        later.shot_time = 31.5;
        let state = state()
            .reduce(Action::AddShot(shot(None)))
            .reduce(Action::AddShot(later));

        let html = ShotsTemplate::new(&state, None).render().unwrap();
        let first = html.find("28s").unwrap();
        let second = html.find("31.5s").unwrap();
        assert!(first < second);
    }

    fn input(dose_in: f64, shot_time: f64) -> ShotFormInput {
        ShotFormInput {
            bean_id: BeanId::new(3),
            grinder_id: GrinderId::new(1),
            machine_id: MachineId::new(2),
            grind_size: 5.0,
            shot_time,
            temperature: None,
            dose_in,
            yield_out: 36.0,
            acidity: TasteScore::default(),
            bitterness: TasteScore::default(),
            sweetness: TasteScore::default(),
            fruitiness: TasteScore::default(),
        }
    }

    #[test]
    fn test_input_check() {
        assert!(input(18.0, 28.0).check().is_ok());

        let err = input(0.0, 28.0).check().unwrap_err();
        assert_eq!(err.to_string(), "Bad request: dose must be greater than zero");

        let err = input(18.0, f64::NAN).check().unwrap_err();
        assert!(err.to_string().contains("shot time"));
    }
}

//! Bean inventory route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use chrono::{DateTime, NaiveDate, Utc};
use espresso_dialer_core::{
    Action, Bean, BeanId, Grinder, ProcessType, RoastLevel, TrackerState,
};
use serde::Deserialize;
use tracing::instrument;

use super::{SelectOption, one_decimal, render};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Grind-setting slider bounded by a grinder's range.
#[derive(Debug, Clone)]
pub struct GrindSliderView {
    pub grinder_name: String,
    pub min: String,
    pub max: String,
    /// Initial slider position: the saved setting, else the grinder minimum.
    pub value: String,
    pub saved: Option<String>,
}

impl GrindSliderView {
    fn new(bean: &Bean, grinder: &Grinder) -> Self {
        Self {
            grinder_name: grinder.name.clone(),
            min: one_decimal(grinder.min_grind_setting),
            max: one_decimal(grinder.max_grind_setting),
            value: one_decimal(bean.grind_setting.unwrap_or(grinder.min_grind_setting)),
            saved: bean.grind_setting.map(one_decimal),
        }
    }
}

/// Bean card view for templates.
#[derive(Debug, Clone)]
pub struct BeanView {
    pub id: String,
    pub origin: String,
    pub process_type: &'static str,
    pub roast_level: &'static str,
    pub roast_date: String,
    pub days_since_roast: i64,
    pub freshness_class: &'static str,
    pub notes: Option<String>,
    /// `None` until a grinder is registered.
    pub grind: Option<GrindSliderView>,
}

impl BeanView {
    #[must_use]
    pub fn new(bean: &Bean, grinder: Option<&Grinder>, now: DateTime<Utc>) -> Self {
        let notes = bean.notes.trim();
        Self {
            id: bean.id.to_string(),
            origin: bean.origin.clone(),
            process_type: bean.process_type.label(),
            roast_level: bean.roast_level.label(),
            roast_date: bean.roast_date.format("%b %-d, %Y").to_string(),
            days_since_roast: bean.days_since_roast(now),
            freshness_class: bean.freshness(now).css_class(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            grind: grinder.map(|g| GrindSliderView::new(bean, g)),
        }
    }
}

/// Beans sharing one roaster.
#[derive(Debug, Clone)]
pub struct RoasterGroupView {
    pub roaster: String,
    pub beans: Vec<BeanView>,
}

/// Beans page template.
#[derive(Template)]
#[template(path = "beans.html")]
pub struct BeansTemplate {
    pub current_path: &'static str,
    pub groups: Vec<RoasterGroupView>,
    pub process_types: Vec<SelectOption>,
    pub roast_levels: Vec<SelectOption>,
    /// Default for the roast date input.
    pub today: String,
    pub grinder_names: Vec<String>,
    pub machine_names: Vec<String>,
}

impl BeansTemplate {
    #[must_use]
    pub fn new(state: &TrackerState, now: DateTime<Utc>) -> Self {
        let grinder = state.default_grinder();
        let groups = state
            .beans_by_roaster()
            .into_iter()
            .map(|(roaster, beans)| RoasterGroupView {
                roaster: roaster.to_string(),
                beans: beans
                    .into_iter()
                    .map(|bean| BeanView::new(bean, grinder, now))
                    .collect(),
            })
            .collect();

        Self {
            current_path: "/beans",
            groups,
            process_types: ProcessType::ALL
                .iter()
                .map(|p| SelectOption::new(p, p.label(), *p == ProcessType::Washed))
                .collect(),
            roast_levels: RoastLevel::ALL
                .iter()
                .map(|r| SelectOption::new(r, r.label(), *r == RoastLevel::Medium))
                .collect(),
            today: now.date_naive().format("%Y-%m-%d").to_string(),
            grinder_names: state.grinders.iter().map(|g| g.name.clone()).collect(),
            machine_names: state.machines.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

/// Form input for adding a bean.
#[derive(Debug, Deserialize)]
pub struct BeanFormInput {
    pub roaster: String,
    pub origin: String,
    pub process_type: ProcessType,
    pub roast_date: NaiveDate,
    pub roast_level: RoastLevel,
    #[serde(default)]
    pub notes: String,
}

/// Form input for saving a bean's grind setting.
#[derive(Debug, Deserialize)]
pub struct GrindSettingFormInput {
    pub grind_setting: f64,
}

/// Beans page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let snapshot = state.store().snapshot().await;
    render(&BeansTemplate::new(&snapshot, Utc::now()))
}

/// Add bean handler.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>, Form(input): Form<BeanFormInput>) -> Redirect {
    let bean = Bean {
        id: BeanId::new(state.store().next_id(Utc::now())),
        roaster: input.roaster.trim().to_string(),
        origin: input.origin.trim().to_string(),
        process_type: input.process_type,
        roast_date: input.roast_date,
        roast_level: input.roast_level,
        notes: input.notes.trim().to_string(),
        grind_setting: None,
    };

    state.store().dispatch(Action::AddBean(bean)).await;
    Redirect::to("/beans")
}

/// Save grind setting handler.
///
/// Replaces the whole bean with a copy carrying the new setting. The bean is
/// looked up under the store's write lock, so a concurrent delete yields 404.
#[instrument(skip(state))]
pub async fn update_grind(
    State(state): State<AppState>,
    Path(id): Path<BeanId>,
    Form(input): Form<GrindSettingFormInput>,
) -> Result<Redirect> {
    state
        .store()
        .try_dispatch(|current| grind_update(current, id, input.grind_setting))
        .await?;
    Ok(Redirect::to("/beans"))
}

/// The `UpdateBean` action saving `setting` on bean `id`.
///
/// The setting is clamped into the default grinder's range, matching what
/// the slider can submit.
fn grind_update(state: &TrackerState, id: BeanId, setting: f64) -> Result<Action> {
    if !setting.is_finite() {
        return Err(AppError::BadRequest(
            "grind setting must be a finite number".to_string(),
        ));
    }

    let bean = state
        .bean(id)
        .ok_or_else(|| AppError::NotFound(format!("bean {id}")))?;
    let setting = state
        .default_grinder()
        .map_or(setting, |grinder| grinder.clamp_setting(setting));

    Ok(Action::UpdateBean(bean.with_grind_setting(setting)))
}

/// Delete bean handler. Shots keep referring to the deleted id.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<BeanId>) -> Redirect {
    state.store().dispatch(Action::DeleteBean(id)).await;
    Redirect::to("/beans")
}

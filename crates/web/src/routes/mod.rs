//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Dashboard
//! GET  /health                          - Health check
//!
//! # Equipment
//! GET  /equipment                       - Grinder and machine lists with forms
//! POST /equipment/grinders              - Add grinder
//! POST /equipment/grinders/{id}/delete  - Delete grinder
//! POST /equipment/machines              - Add machine
//! POST /equipment/machines/{id}/delete  - Delete machine
//!
//! # Beans
//! GET  /beans                           - Beans grouped by roaster
//! POST /beans                           - Add bean
//! POST /beans/{id}/grind                - Save grind setting
//! POST /beans/{id}/delete               - Delete bean
//!
//! # Shots
//! GET  /shots                           - Shot form (?bean= prefill) and history
//! POST /shots                           - Record shot
//!
//! # Stats
//! GET  /stats                           - Per-pairing statistics and charts
//! ```
//!
//! Every POST answers `303 See Other` back to its page.

pub mod beans;
pub mod dashboard;
pub mod equipment;
pub mod shots;
pub mod stats;

use std::fmt::Display;
use std::str::FromStr;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::show))
        .route("/equipment", get(equipment::index))
        .route("/equipment/grinders", post(equipment::create_grinder))
        .route(
            "/equipment/grinders/{id}/delete",
            post(equipment::delete_grinder),
        )
        .route("/equipment/machines", post(equipment::create_machine))
        .route(
            "/equipment/machines/{id}/delete",
            post(equipment::delete_machine),
        )
        .route("/beans", get(beans::index).post(beans::create))
        .route("/beans/{id}/grind", post(beans::update_grind))
        .route("/beans/{id}/delete", post(beans::delete))
        .route("/shots", get(shots::index).post(shots::create))
        .route("/stats", get(stats::show))
}

/// Render a template, surfacing failures as `AppError::Template`.
pub(crate) fn render(template: &impl Template) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

/// An option in a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Display, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// Treat a blank form or query value as absent.
pub(crate) fn empty_string_as_none<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Format a measurement to one decimal place.
pub(crate) fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        value: Option<f64>,
    }

    fn probe(json: &str) -> std::result::Result<Probe, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_empty_string_as_none() {
        assert_eq!(probe(r#"{"value": ""}"#).unwrap().value, None);
        assert_eq!(probe(r#"{"value": "  "}"#).unwrap().value, None);
        assert_eq!(probe("{}").unwrap().value, None);
        assert_eq!(probe(r#"{"value": "92.5"}"#).unwrap().value, Some(92.5));
        assert!(probe(r#"{"value": "hot"}"#).is_err());
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(5.0), "5.0");
        assert_eq!(one_decimal(27.26), "27.3");
    }
}

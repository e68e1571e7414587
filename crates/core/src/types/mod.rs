//! Core types for Espresso Dialer.
//!
//! Entities are immutable value records. They are replaced wholesale on
//! update and reference each other only through typed IDs.

pub mod bean;
pub mod category;
pub mod equipment;
pub mod id;
pub mod shot;
pub mod taste;

pub use bean::{Bean, Freshness};
pub use category::{MachineType, ParseCategoryError, ProcessType, RoastLevel};
pub use equipment::{GrindRangeError, Grinder, Machine};
pub use id::*;
pub use shot::{BrewRatio, Shot};
pub use taste::{TasteDimension, TasteScore, TasteScoreError, Tastes};

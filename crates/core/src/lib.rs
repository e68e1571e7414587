//! Espresso Dialer Core - Domain types, state store and shot statistics.
//!
//! This crate provides everything the tracker knows about espresso:
//! - `types` - Grinders, machines, beans, shots and their typed IDs
//! - `store` - The in-memory tracker state and the pure action reducer
//! - `stats` - Equipment-pairing statistics and chart series
//! - `intensity` - The 1-10 taste intensity bar and its drag protocol
//!
//! # Architecture
//!
//! The core crate contains no I/O, no HTTP and no persistence. State is an
//! ordinary value: every action produces a new [`TrackerState`] from the old
//! one, which keeps the whole domain testable without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod intensity;
pub mod stats;
pub mod store;
pub mod types;

pub use store::{Action, TrackerState};
pub use types::*;

//! The tracker state and its action reducer.
//!
//! [`TrackerState`] is a plain value holding the four entity collections.
//! It is never edited in place: [`TrackerState::reduce`] takes the current
//! snapshot and an [`Action`] and returns the next snapshot.
//!
//! # Actions
//!
//! | Action          | Effect                                              |
//! |-----------------|-----------------------------------------------------|
//! | `AddGrinder`    | append to `grinders`                                |
//! | `AddMachine`    | append to `machines`                                |
//! | `AddBean`       | append to `beans`                                   |
//! | `AddShot`       | append to `shots`                                   |
//! | `UpdateBean`    | replace the bean with the same ID, if any           |
//! | `DeleteGrinder` | remove grinders with the ID; shots are untouched    |
//! | `DeleteMachine` | remove machines with the ID; shots are untouched    |
//! | `DeleteBean`    | remove beans with the ID; shots are untouched       |
//!
//! Shots are append-only: there is no action that edits or removes one.
//! Payloads are stored as given; validation belongs to the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Bean, BeanId, Grinder, GrinderId, Machine, MachineId, Shot};

/// A discrete state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddGrinder(Grinder),
    AddMachine(Machine),
    AddBean(Bean),
    AddShot(Shot),
    UpdateBean(Bean),
    DeleteGrinder(GrinderId),
    DeleteMachine(MachineId),
    DeleteBean(BeanId),
}

impl Action {
    /// Stable name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddGrinder(_) => "ADD_GRINDER",
            Self::AddMachine(_) => "ADD_MACHINE",
            Self::AddBean(_) => "ADD_BEAN",
            Self::AddShot(_) => "ADD_SHOT",
            Self::UpdateBean(_) => "UPDATE_BEAN",
            Self::DeleteGrinder(_) => "DELETE_GRINDER",
            Self::DeleteMachine(_) => "DELETE_MACHINE",
            Self::DeleteBean(_) => "DELETE_BEAN",
        }
    }
}

/// Everything the tracker knows, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub grinders: Vec<Grinder>,
    pub machines: Vec<Machine>,
    pub beans: Vec<Bean>,
    pub shots: Vec<Shot>,
}

impl TrackerState {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action` and return the resulting snapshot.
    ///
    /// `self` is left untouched.
    #[must_use]
    pub fn reduce(&self, action: Action) -> Self {
        let mut next = self.clone();
        match action {
            Action::AddGrinder(grinder) => next.grinders.push(grinder),
            Action::AddMachine(machine) => next.machines.push(machine),
            Action::AddBean(bean) => next.beans.push(bean),
            Action::AddShot(shot) => next.shots.push(shot),
            Action::UpdateBean(bean) => {
                for existing in &mut next.beans {
                    if existing.id == bean.id {
                        *existing = bean.clone();
                    }
                }
            }
            Action::DeleteGrinder(id) => next.grinders.retain(|g| g.id != id),
            Action::DeleteMachine(id) => next.machines.retain(|m| m.id != id),
            Action::DeleteBean(id) => next.beans.retain(|b| b.id != id),
        }
        next
    }

    /// Look up a grinder. `None` when it was never added or has been deleted.
    #[must_use]
    pub fn grinder(&self, id: GrinderId) -> Option<&Grinder> {
        self.grinders.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn bean(&self, id: BeanId) -> Option<&Bean> {
        self.beans.iter().find(|b| b.id == id)
    }

    /// The last `limit` shots, most recent first.
    #[must_use]
    pub fn recent_shots(&self, limit: usize) -> Vec<&Shot> {
        self.shots.iter().rev().take(limit).collect()
    }

    /// Beans grouped by roaster, groups ordered by first appearance.
    #[must_use]
    pub fn beans_by_roaster(&self) -> Vec<(&str, Vec<&Bean>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&Bean>)> = Vec::new();

        for bean in &self.beans {
            let roaster = bean.roaster.as_str();
            if let Some(&position) = index.get(roaster) {
                if let Some((_, beans)) = groups.get_mut(position) {
                    beans.push(bean);
                }
            } else {
                index.insert(roaster, groups.len());
                groups.push((roaster, vec![bean]));
            }
        }

        groups
    }

    /// The grinder used for per-bean grind-setting adjustment.
    ///
    /// Beans do not record a grinder, so the first registered one is used.
    #[must_use]
    pub fn default_grinder(&self) -> Option<&Grinder> {
        self.grinders.first()
    }
}

//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use espresso_dialer_core::{Action, TrackerState};
use tokio::sync::RwLock;

use crate::config::WebConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the tracker store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    store: Store,
}

impl AppState {
    /// Create application state with an empty store.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        Self::with_store(config, TrackerState::new())
    }

    /// Create application state seeded with `initial`.
    #[must_use]
    pub fn with_store(config: WebConfig, initial: TrackerState) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Store::new(initial),
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the tracker store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }
}

/// The process-wide tracker store.
///
/// Readers get an immutable snapshot; writers run the reducer under the
/// write lock and swap in the result, so a reader never sees a half-applied
/// action.
#[derive(Debug)]
pub struct Store {
    current: RwLock<Arc<TrackerState>>,
    last_id: AtomicI64,
}

impl Store {
    #[must_use]
    pub fn new(initial: TrackerState) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            last_id: AtomicI64::new(i64::MIN),
        }
    }

    /// A fresh entity id: the creation time in milliseconds, bumped past the
    /// previous id when two entities are created within the same millisecond.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let bump = |last: i64| candidate.max(last.saturating_add(1));
        match self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
        {
            Ok(last) | Err(last) => bump(last),
        }
    }

    /// The current state.
    pub async fn snapshot(&self) -> Arc<TrackerState> {
        Arc::clone(&*self.current.read().await)
    }

    /// Apply `action` and return the new state.
    pub async fn dispatch(&self, action: Action) -> Arc<TrackerState> {
        let kind = action.kind();
        let mut current = self.current.write().await;
        let next = Arc::new(current.reduce(action));
        *current = Arc::clone(&next);
        drop(current);

        log_dispatched(kind, &next);
        next
    }

    /// Build an action from the current state and apply it under the same
    /// write lock, so the state `build` inspected is the one reduced.
    ///
    /// # Errors
    ///
    /// Returns whatever `build` returns; the store is left untouched.
    pub async fn try_dispatch<F, E>(&self, build: F) -> Result<Arc<TrackerState>, E>
    where
        F: FnOnce(&TrackerState) -> Result<Action, E>,
    {
        let mut current = self.current.write().await;
        let action = build(&current)?;
        let kind = action.kind();
        let next = Arc::new(current.reduce(action));
        *current = Arc::clone(&next);
        drop(current);

        log_dispatched(kind, &next);
        Ok(next)
    }
}

fn log_dispatched(kind: &str, next: &TrackerState) {
    tracing::info!(
        action = kind,
        grinders = next.grinders.len(),
        machines = next.machines.len(),
        beans = next.beans.len(),
        shots = next.shots.len(),
        "Dispatched action"
    );
}

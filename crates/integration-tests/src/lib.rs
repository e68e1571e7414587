//! End-to-end tests for Espresso Dialer.
//!
//! Each test serves the real router on an ephemeral port and talks to it
//! over HTTP, so the middleware stack, form decoding and redirects are
//! exercised exactly as a browser would see them.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p espresso-dialer-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use chrono::NaiveDate;
use espresso_dialer_core::{
    Action, Bean, BeanId, Grinder, GrinderId, Machine, MachineId, MachineType, ProcessType,
    RoastLevel, TrackerState,
};
use espresso_dialer_web::{app, config::WebConfig, state::AppState};
use reqwest::{Client, Response, redirect};
use tokio::net::TcpListener;

/// Grinder id used by [`equipped_state`].
pub const GRINDER_ID: i64 = 1;
/// Machine id used by [`equipped_state`].
pub const MACHINE_ID: i64 = 2;
/// Bean id used by [`equipped_state`].
pub const BEAN_ID: i64 = 3;

/// A running server and a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Serve an empty tracker.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with(TrackerState::new()).await
    }

    /// Serve a tracker seeded with `initial`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn_with(initial: TrackerState) -> Self {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let state = AppState::with_store(WebConfig::default(), initial);
        tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("Test server error");
        });

        // Redirects are asserted on, not followed.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the body, asserting a 200.
    ///
    /// # Panics
    ///
    /// Panics on a transport error or a non-200 status.
    pub async fn page(&self, path: &str) -> String {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(response.status(), 200, "GET {path}");
        response.text().await.expect("Body was not text")
    }

    /// POST a urlencoded form to `path` without following redirects.
    ///
    /// # Panics
    ///
    /// Panics on a transport error.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }
}

/// Assert `response` is a 303 redirect to `location`.
///
/// # Panics
///
/// Panics when the status or `Location` header differ.
pub fn assert_see_other(response: &Response, location: &str) {
    assert_eq!(response.status(), 303);
    let header = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok());
    assert_eq!(header, Some(location));
}

/// A tracker with one grinder, one machine and one bean under fixed ids.
///
/// # Panics
///
/// Never; the fixture values are valid.
#[must_use]
pub fn equipped_state() -> TrackerState {
    let grinder = Grinder::new(GrinderId::new(GRINDER_ID), "Niche Zero", "Niche", 1.0, 50.0)
        .expect("Fixture grinder range is valid");
    let machine = Machine {
        id: MachineId::new(MACHINE_ID),
        name: "Linea Micra".to_string(),
        brand: "La Marzocco".to_string(),
        machine_type: MachineType::SemiAutomatic,
    };
    let bean = Bean {
        id: BeanId::new(BEAN_ID),
        roaster: "Sey".to_string(),
        origin: "Kenya".to_string(),
        process_type: ProcessType::Washed,
        roast_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("Fixture date is valid"),
        roast_level: RoastLevel::Light,
        notes: String::new(),
        grind_setting: Some(12.5),
    };

    TrackerState::new()
        .reduce(Action::AddGrinder(grinder))
        .reduce(Action::AddMachine(machine))
        .reduce(Action::AddBean(bean))
}

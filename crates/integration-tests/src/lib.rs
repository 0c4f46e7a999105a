//! Integration tests for the Liubiljett session accessor.
//!
//! Tests run the real `HttpResourceClient` against a `wiremock` server that
//! stands in for the Liubiljett API, so no network access or credentials are
//! needed.
//!
//! ```bash
//! cargo test -p liubiljett-integration-tests
//! ```

use std::sync::{Arc, Mutex};

use liubiljett_session::{
    ApiConfig, ErrorReporter, HttpResourceClient, SessionService, UserContext,
};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Path prefix the mock API is mounted under.
pub const API_PREFIX: &str = "/api/";

/// Records user context changes; `None` marks a clear.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Option<UserContext>>>,
}

impl RecordingReporter {
    /// Every set/clear seen so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder of the lock panicked.
    #[must_use]
    pub fn events(&self) -> Vec<Option<UserContext>> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn set_user_context(&self, user: &UserContext) {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .push(Some(user.clone()));
    }

    fn clear_user_context(&self) {
        self.events.lock().expect("reporter lock poisoned").push(None);
    }
}

/// Session accessor type used by the tests.
pub type TestSession = SessionService<HttpResourceClient, Arc<RecordingReporter>>;

/// API configuration pointing at the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid base URL.
#[must_use]
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::new(&format!("{}{API_PREFIX}", server.uri())).expect("mock server URI is a base URL")
}

/// Build a session accessor against the mock server.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn session_for(config: &ApiConfig) -> (TestSession, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let client = HttpResourceClient::new(config).expect("HTTP client builds");
    (SessionService::new(client, Arc::clone(&reporter)), reporter)
}

/// A `people/current` body whose default cart is `cart_url`.
#[must_use]
pub fn person_body(cart_url: &str) -> Value {
    json!({
        "id": 7,
        "email": "anna@liubiljett.se",
        "first_name": "Anna",
        "last_name": "Andersson",
        "default_cart": cart_url
    })
}

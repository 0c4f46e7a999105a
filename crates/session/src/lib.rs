//! Liubiljett session accessor.
//!
//! Fetches the logged-in person and their default cart from the Liubiljett
//! REST API, memoizes them in process memory and reports the logged-in
//! identity to Sentry.
//!
//! # Example
//!
//! ```rust,ignore
//! use liubiljett_session::{SessionConfig, SessionService};
//!
//! let config = SessionConfig::from_env()?;
//! let session = SessionService::from_config(&config.api)?;
//!
//! match session.get_current_person().await? {
//!     Some(person) => tracing::info!(person_id = %person.id, "logged in"),
//!     None => tracing::info!("anonymous visitor"),
//! }
//!
//! let cart = session.get_current_cart().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod reporter;
pub mod session;
pub mod types;

pub use api::{ApiError, HttpResourceClient, ResourceClient};
pub use config::{ApiConfig, ConfigError, SessionConfig};
pub use error::SessionError;
pub use reporter::{ErrorReporter, SentryReporter};
pub use session::{CURRENT_PERSON_PATH, CachedPerson, SessionService};
pub use types::{Cart, Person, UserContext};

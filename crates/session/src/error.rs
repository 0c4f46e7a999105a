//! Session accessor errors.

use liubiljett_core::PersonId;
use thiserror::Error;

use crate::api::ApiError;

/// Errors returned by [`SessionService`](crate::SessionService).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Fetching a resource failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No one is logged in.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The person has no default cart to fetch.
    #[error("Person {0} has no default cart")]
    NoDefaultCart(PersonId),
}

/// Result type alias for `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;

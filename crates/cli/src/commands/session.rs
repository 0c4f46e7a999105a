//! Session inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the logged-in person
//! lb-cli whoami
//!
//! # Print the logged-in person's default cart
//! lb-cli cart
//! ```
//!
//! # Environment Variables
//!
//! - `LIUBILJETT_API_URL` - Base URL of the Liubiljett REST API
//! - `LIUBILJETT_API_TOKEN` - API token identifying the person

use liubiljett_session::{ApiError, ConfigError, SessionError, SessionService};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a session command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be created.
    #[error("Client error: {0}")]
    Client(#[from] ApiError),

    /// Session lookup failed.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Print the logged-in person as JSON, or `null` for an anonymous visitor.
pub async fn whoami(session: &SessionService) -> Result<(), CommandError> {
    let person = session.get_current_person().await?;

    if person.is_none() {
        tracing::warn!("Not logged in; set LIUBILJETT_API_TOKEN to identify yourself");
    }

    print_json(&person)
}

/// Print the logged-in person's default cart as JSON.
pub async fn cart(session: &SessionService) -> Result<(), CommandError> {
    let cart = session.get_current_cart().await?;
    tracing::info!(cart_id = %cart.id, "Fetched default cart");
    print_json(&cart)
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_reported_as_command_error() {
        let err = CommandError::from(ConfigError::MissingEnvVar(
            "LIUBILJETT_API_URL".to_string(),
        ));
        assert!(matches!(err, CommandError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: LIUBILJETT_API_URL"
        );
    }
}

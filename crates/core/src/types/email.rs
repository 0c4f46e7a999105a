//! Email address type.
//!
//! Emails arrive from the API and are deserialized as-is; a server-sent
//! address that fails [`Email::parse`] still deserializes. Use
//! [`Email::is_valid`] to decide whether to pass it on.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// The part before the @ is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The part after the @ is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
}

/// An email address.
///
/// ## Constraints enforced by [`Email::parse`]
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Exactly one @ symbol, with non-empty text on both sides
///
/// ```
/// use liubiljett_core::Email;
///
/// assert!(Email::parse("anna@liubiljett.se").is_ok());
/// assert!(Email::parse("anna").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming the first constraint the input breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        validate(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Whether the address satisfies the constraints of [`Email::parse`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        validate(&self.0).is_ok()
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, domain)| domain)
    }
}

fn validate(s: &str) -> Result<(), EmailError> {
    if s.is_empty() {
        return Err(EmailError::Empty);
    }
    if s.len() > Email::MAX_LENGTH {
        return Err(EmailError::TooLong {
            max: Email::MAX_LENGTH,
        });
    }

    let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
    if domain.contains('@') {
        return Err(EmailError::AtSymbol);
    }
    if local.is_empty() {
        return Err(EmailError::EmptyLocalPart);
    }
    if domain.is_empty() {
        return Err(EmailError::EmptyDomain);
    }
    Ok(())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Email::parse("anna@liubiljett.se").is_ok());
        assert!(Email::parse("anna.andersson+sof@student.liu.se").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("annan123"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("@liu.se"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("anna@"), Err(EmailError::EmptyDomain));

        let long = format!("{}@liu.se", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        ));
    }

    #[test]
    fn test_deserialize_is_lenient() {
        let email: Email = serde_json::from_str("\"\"").unwrap();
        assert!(!email.is_valid());

        let email: Email = serde_json::from_str("\"anna@liubiljett.se\"").unwrap();
        assert!(email.is_valid());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"anna@liubiljett.se\"");
    }

    #[test]
    fn test_domain() {
        let email: Email = "anna@liubiljett.se".parse().unwrap();
        assert_eq!(email.domain(), Some("liubiljett.se"));
        assert_eq!(email.to_string(), "anna@liubiljett.se");
    }
}

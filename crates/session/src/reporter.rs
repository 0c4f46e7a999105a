//! Error tracker integration.
//!
//! The session accessor reports who is logged in so errors captured later
//! are associated with that person.

use crate::types::UserContext;

/// Receives the logged-in identity for error reports.
pub trait ErrorReporter: Send + Sync {
    /// Associate subsequent error reports with `user`.
    fn set_user_context(&self, user: &UserContext);

    /// Stop associating error reports with a user.
    fn clear_user_context(&self);
}

impl<R: ErrorReporter> ErrorReporter for std::sync::Arc<R> {
    fn set_user_context(&self, user: &UserContext) {
        (**self).set_user_context(user);
    }

    fn clear_user_context(&self) {
        (**self).clear_user_context();
    }
}

/// Reports the user context to Sentry.
///
/// Writes to the scope of the current hub. Under `#[tokio::main]` the main
/// task runs on the main thread, so that is the process hub; threads started
/// afterwards inherit the user from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentryReporter;

impl ErrorReporter for SentryReporter {
    fn set_user_context(&self, user: &UserContext) {
        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(user.id.to_string()),
                email: user.email.as_ref().map(|e| e.as_str().to_owned()),
                ..Default::default()
            }));
        });
    }

    fn clear_user_context(&self) {
        sentry::configure_scope(|scope| {
            scope.set_user(None);
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use liubiljett_core::{Email, PersonId};

    #[test]
    fn test_sentry_reporter_attaches_and_clears_user() {
        let events = sentry::test::with_captured_events(|| {
            SentryReporter.set_user_context(&UserContext {
                id: PersonId::new(1),
                email: Some(Email::parse("anna@liubiljett.se").unwrap()),
            });
            sentry::capture_message("while logged in", sentry::Level::Error);

            SentryReporter.clear_user_context();
            sentry::capture_message("after logout", sentry::Level::Error);
        });

        assert_eq!(events.len(), 2);

        let user = events.first().unwrap().user.as_ref().unwrap();
        assert_eq!(user.id.as_deref(), Some("1"));
        assert_eq!(user.email.as_deref(), Some("anna@liubiljett.se"));

        assert!(events.get(1).unwrap().user.is_none());
    }

    #[test]
    fn test_sentry_reporter_omits_missing_email() {
        let events = sentry::test::with_captured_events(|| {
            SentryReporter.set_user_context(&UserContext {
                id: PersonId::new(2),
                email: None,
            });
            sentry::capture_message("no email", sentry::Level::Error);
        });

        let user = events.first().unwrap().user.as_ref().unwrap();
        assert_eq!(user.id.as_deref(), Some("2"));
        assert!(user.email.is_none());
    }
}

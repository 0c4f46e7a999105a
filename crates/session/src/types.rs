//! Domain types for the Liubiljett people and carts resources.
//!
//! Only the fields the session accessor relies on are typed; everything else
//! the server sends is kept in `extra` so callers see the full body.

use liubiljett_core::{CartId, Email, PersonId};
use serde::{Deserialize, Serialize};

/// The logged-in person as returned by `GET people/current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Person ID.
    pub id: PersonId,
    /// Email address as sent by the server (not validated).
    pub email: Email,
    /// Locator of the person's default cart (absolute URL or API path).
    #[serde(default)]
    pub default_cart: Option<String>,
    /// Remaining fields of the resource.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A cart as returned by `GET <default_cart>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Remaining fields of the resource.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Identity forwarded to the error tracker once a person is known.
///
/// A malformed server-sent email is left out rather than reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub id: PersonId,
    pub email: Option<Email>,
}

impl From<&Person> for UserContext {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id,
            email: person.email.is_valid().then(|| person.email.clone()),
        }
    }
}

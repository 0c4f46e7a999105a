//! Session accessor: the current person and their default cart.
//!
//! The person is memoized for the life of the process once the API has
//! answered with either a person or a 401. Other failures are not cached,
//! so the next call asks again. The cart is stored after every fetch but
//! always re-fetched on request.
//!
//! Concurrent callers that arrive before the person is resolved each issue
//! their own request; the cache lock is never held across a network call.
//! A fetch that completes after [`SessionService::reset`] is returned to its
//! caller but neither cached nor reported.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::api::{ApiError, HttpResourceClient, ResourceClient};
use crate::config::ApiConfig;
use crate::error::{Result, SessionError};
use crate::reporter::{ErrorReporter, SentryReporter};
use crate::types::{Cart, Person, UserContext};

/// API path of the current-person resource.
pub const CURRENT_PERSON_PATH: &str = "people/current";

/// Resolved state of the person cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPerson {
    /// Someone is logged in.
    Authenticated(Person),
    /// The API answered 401.
    Anonymous,
}

impl CachedPerson {
    /// The logged-in person, if any.
    #[must_use]
    pub const fn person(&self) -> Option<&Person> {
        match self {
            Self::Authenticated(person) => Some(person),
            Self::Anonymous => None,
        }
    }

    /// Consume the cache entry, yielding the logged-in person, if any.
    #[must_use]
    pub fn into_person(self) -> Option<Person> {
        match self {
            Self::Authenticated(person) => Some(person),
            Self::Anonymous => None,
        }
    }
}

/// Memoizing accessor for the current session.
///
/// Cheap to clone; clones share the same caches.
pub struct SessionService<C = HttpResourceClient, R = SentryReporter> {
    inner: Arc<SessionInner<C, R>>,
}

struct SessionInner<C, R> {
    client: C,
    reporter: R,
    person: RwLock<Option<CachedPerson>>,
    cart: RwLock<Option<Cart>>,
    /// Bumped by `reset`; results fetched under an older value are stale.
    generation: AtomicU64,
}

impl<C, R> Clone for SessionService<C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SessionService {
    /// Create a session accessor talking HTTP to the configured API and
    /// reporting the user to Sentry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be created.
    pub fn from_config(config: &ApiConfig) -> std::result::Result<Self, ApiError> {
        Ok(Self::new(HttpResourceClient::new(config)?, SentryReporter))
    }
}

impl<C: ResourceClient, R: ErrorReporter> SessionService<C, R> {
    /// Create a session accessor with empty caches.
    #[must_use]
    pub fn new(client: C, reporter: R) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                reporter,
                person: RwLock::new(None),
                cart: RwLock::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Get the logged-in person.
    ///
    /// Returns `Ok(None)` when the API reports the visitor as not
    /// authenticated (401); that answer is cached like a person is. On
    /// success the person's id and email are reported to the error tracker.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` for any other failed fetch. The failure is
    /// logged and nothing is cached.
    #[instrument(skip(self))]
    pub async fn get_current_person(&self) -> Result<Option<Person>> {
        let cached = self.inner.person.read().await.clone();
        if let Some(cached) = cached {
            debug!(
                authenticated = cached.person().is_some(),
                "Current person served from cache"
            );
            return Ok(cached.into_person());
        }

        let generation = self.generation();
        match self.fetch::<Person>(CURRENT_PERSON_PATH).await {
            Ok(person) => {
                // Reporting under the lock keeps it ordered with `reset`
                let mut slot = self.inner.person.write().await;
                if self.generation() != generation {
                    debug!(person_id = %person.id, "Session reset during fetch, person not cached");
                    return Ok(Some(person));
                }
                *slot = Some(CachedPerson::Authenticated(person.clone()));
                self.inner
                    .reporter
                    .set_user_context(&UserContext::from(&person));
                info!(person_id = %person.id, "Current person resolved");
                Ok(Some(person))
            }
            Err(e) if e.is_unauthorized() => {
                let mut slot = self.inner.person.write().await;
                if self.generation() == generation {
                    *slot = Some(CachedPerson::Anonymous);
                }
                debug!("Visitor is not authenticated");
                Ok(None)
            }
            Err(e) => {
                error!(error = %e, "Got a bad response from the server");
                Err(e.into())
            }
        }
    }

    /// Fetch the logged-in person's default cart.
    ///
    /// Always issues a request; the result replaces the stored cart.
    ///
    /// # Errors
    ///
    /// - Any error from [`get_current_person`](Self::get_current_person)
    /// - `SessionError::NotAuthenticated` if no one is logged in
    /// - `SessionError::NoDefaultCart` if the person has no cart locator
    /// - `SessionError::Api` if the cart fetch fails
    #[instrument(skip(self))]
    pub async fn get_current_cart(&self) -> Result<Cart> {
        let generation = self.generation();
        let person = self
            .get_current_person()
            .await?
            .ok_or(SessionError::NotAuthenticated)?;
        let location = person
            .default_cart
            .as_deref()
            .ok_or(SessionError::NoDefaultCart(person.id))?;

        let cart: Cart = self.fetch(location).await?;
        {
            let mut slot = self.inner.cart.write().await;
            if self.generation() == generation {
                *slot = Some(cart.clone());
                debug!(cart_id = %cart.id, "Current cart fetched");
            } else {
                debug!(cart_id = %cart.id, "Session reset during fetch, cart not cached");
            }
        }

        Ok(cart)
    }

    /// The person cache, without touching the network.
    pub async fn cached_person(&self) -> Option<CachedPerson> {
        self.inner.person.read().await.clone()
    }

    /// The most recently fetched cart, without touching the network.
    pub async fn cached_cart(&self) -> Option<Cart> {
        self.inner.cart.read().await.clone()
    }

    /// Forget the cached person and cart and clear the error tracker's user.
    ///
    /// Call this on logout; the next call fetches again.
    pub async fn reset(&self) {
        let mut person = self.inner.person.write().await;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        *person = None;
        *self.inner.cart.write().await = None;
        self.inner.reporter.clear_user_context();
        drop(person);
        debug!("Session caches cleared");
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    async fn fetch<T: DeserializeOwned>(&self, location: &str) -> std::result::Result<T, ApiError> {
        let body = self.inner.client.get(location).await?;
        Ok(serde_json::from_value(body)?)
    }
}

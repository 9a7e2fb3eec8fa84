//! Credential lifecycle functions and their session-backed defaults.
//!
//! The guard chain never touches storage directly. It calls three injected
//! functions:
//!
//! - `retrieve(request)` - loads the login flag and roles for a request
//! - `save(request, logged_in, roles)` - persists them after a mutation
//! - `initialize(request)` - supplies roles on login (or `None` to keep them)
//!
//! The defaults keep credentials in the [actix-session](actix_session) session
//! under [`CREDENTIALS_KEY`]. `SessionMiddleware` must wrap the application
//! for them to persist anything.

use std::future::Future;
use std::sync::Arc;

use actix_session::SessionExt;
use actix_web::{Error, HttpRequest, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture};
use serde::{Deserialize, Serialize};

use crate::http::error::AccessError;

/// Session key the default store writes credentials under.
pub const CREDENTIALS_KEY: &str = "_credentials_data_";

/// Loads credentials for a request.
pub type RetrieveFn =
    Arc<dyn Fn(HttpRequest) -> LocalBoxFuture<'static, Result<Credentials, Error>> + Send + Sync>;

/// Persists a principal's login flag and roles.
pub type SaveFn = Arc<
    dyn Fn(HttpRequest, bool, Vec<String>) -> LocalBoxFuture<'static, Result<(), Error>>
        + Send
        + Sync,
>;

/// Supplies the roles of a principal that just logged in.
pub type InitializeFn = Arc<
    dyn Fn(HttpRequest) -> LocalBoxFuture<'static, Result<Option<Vec<String>>, Error>>
        + Send
        + Sync,
>;

/// Builds the response for a denied request.
pub type ResponderFn = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// What `retrieve` found for a request.
///
/// `roles: None` means no credentials are available: no principal is
/// attached to the request and global protection is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub logged_in: bool,
    pub roles: Option<Vec<String>>,
}

impl Credentials {
    pub fn new(logged_in: bool, roles: Vec<String>) -> Self {
        Credentials {
            logged_in,
            roles: Some(roles),
        }
    }

    /// Credentials that could not be loaded.
    pub fn unavailable() -> Self {
        Credentials {
            logged_in: false,
            roles: None,
        }
    }
}

/// The record the default store keeps in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub loggedin: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Wraps an async closure as a [`RetrieveFn`].
pub fn retrieve_fn<F, Fut>(f: F) -> RetrieveFn
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Credentials, Error>> + 'static,
{
    Arc::new(move |req| -> LocalBoxFuture<'static, Result<Credentials, Error>> {
        Box::pin(f(req))
    })
}

/// Wraps an async closure as a [`SaveFn`].
pub fn save_fn<F, Fut>(f: F) -> SaveFn
where
    F: Fn(HttpRequest, bool, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + 'static,
{
    Arc::new(
        move |req, logged_in, roles| -> LocalBoxFuture<'static, Result<(), Error>> {
            Box::pin(f(req, logged_in, roles))
        },
    )
}

/// Wraps an async closure as an [`InitializeFn`].
pub fn initialize_fn<F, Fut>(f: F) -> InitializeFn
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Vec<String>>, Error>> + 'static,
{
    Arc::new(
        move |req| -> LocalBoxFuture<'static, Result<Option<Vec<String>>, Error>> {
            Box::pin(f(req))
        },
    )
}

/// Wraps a closure as a [`ResponderFn`].
pub fn responder_fn<F>(f: F) -> ResponderFn
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Reads credentials from the session. A session without an entry yields a
/// logged-out principal with no roles.
pub fn session_retrieve(req: HttpRequest) -> LocalBoxFuture<'static, Result<Credentials, Error>> {
    let result: Result<Credentials, Error> = req
        .get_session()
        .get::<StoredCredentials>(CREDENTIALS_KEY)
        .map(|stored| {
            let stored = stored.unwrap_or_default();
            Credentials::new(stored.loggedin, stored.roles)
        })
        .map_err(|e| AccessError::Storage(e.to_string()).into());
    Box::pin(ready(result))
}

/// Writes credentials to the session.
pub fn session_save(
    req: HttpRequest,
    logged_in: bool,
    roles: Vec<String>,
) -> LocalBoxFuture<'static, Result<(), Error>> {
    let stored = StoredCredentials {
        loggedin: logged_in,
        roles,
    };
    let result: Result<(), Error> = req
        .get_session()
        .insert(CREDENTIALS_KEY, stored)
        .map_err(|e| AccessError::Storage(e.to_string()).into());
    Box::pin(ready(result))
}

/// Keeps the current roles on login.
pub fn noop_initialize(
    _req: HttpRequest,
) -> LocalBoxFuture<'static, Result<Option<Vec<String>>, Error>> {
    Box::pin(ready(Ok(None)))
}

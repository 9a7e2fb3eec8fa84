//! Guard chain configuration.
//!
//! [`AccessControlConfig`] is resolved once when the middleware is built and
//! is never mutated afterwards. It can be built two ways:
//!
//! - builder methods on [`AccessControlConfig::default()`]
//! - [`AccessControlConfig::from_options`], merging an [`AccessControlOptions`]
//!   onto the defaults
//!
//! Either way list settings (ignored paths, secured paths, super-admin roles)
//! extend the defaults without duplicates, and every other setting replaces
//! its default.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use actix_web::{http, Error, HttpRequest, HttpResponse};

use crate::http::access::expression::RoleExpression;
use crate::http::access::path::{PathRule, PathRules};
use crate::http::access::principal::PrincipalContext;
use crate::http::access::store::{
    initialize_fn, noop_initialize, responder_fn, retrieve_fn, save_fn, session_retrieve,
    session_save, Credentials, InitializeFn, ResponderFn, RetrieveFn, SaveFn,
};

/// Path ignored by default.
pub const DEFAULT_IGNORED_PATH: &str = "/favicon.ico";
/// Role that satisfies every requirement by default.
pub const DEFAULT_SUPER_ADMIN: &str = "superadmin";
/// Where unauthenticated requests are sent by default.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Resolved configuration of an [`AccessControl`](super::AccessControl) guard chain.
///
/// # Example
/// ```
/// use actix_access_control_core::roles;
/// use actix_access_control_core::http::access::{AccessControlConfig, PathRule};
///
/// let config = AccessControlConfig::default()
///     .ignored_path(PathRule::pattern("^/static/").unwrap())
///     .secured_path(PathRule::pattern("^/admin").unwrap())
///     .required_logged_in(true)
///     .required_roles(roles![["admin", "moderator"]])
///     .super_admin("root")
///     .login_path("/signin");
///
/// assert!(config.ignored_paths().matches("/favicon.ico"));
/// assert_eq!(config.super_admin_roles(), ["superadmin", "root"]);
/// ```
#[derive(Clone)]
pub struct AccessControlConfig {
    ignored_paths: PathRules,
    secured_paths: PathRules,
    required_logged_in: bool,
    required_roles: RoleExpression,
    super_admin: Arc<[String]>,
    login_path: String,
    retrieve: RetrieveFn,
    save: SaveFn,
    initialize: InitializeFn,
    unauthenticated: Option<ResponderFn>,
    unauthorized: Option<ResponderFn>,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        AccessControlConfig {
            ignored_paths: PathRules::new().with(DEFAULT_IGNORED_PATH),
            secured_paths: PathRules::new(),
            required_logged_in: false,
            required_roles: RoleExpression::empty(),
            super_admin: Arc::from(vec![DEFAULT_SUPER_ADMIN.to_string()]),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            retrieve: Arc::new(session_retrieve),
            save: Arc::new(session_save),
            initialize: Arc::new(noop_initialize),
            unauthenticated: None,
            unauthorized: None,
        }
    }
}

impl AccessControlConfig {
    /// Merges `options` onto the defaults.
    pub fn from_options(options: AccessControlOptions) -> Self {
        Self::default().merge(options)
    }

    /// Merges `options` onto this configuration.
    pub fn merge(mut self, options: AccessControlOptions) -> Self {
        if let Some(paths) = options.ignored_paths {
            self.ignored_paths = self.ignored_paths.merge(paths);
        }
        if let Some(paths) = options.secured_paths {
            self.secured_paths = self.secured_paths.merge(paths);
        }
        if let Some(roles) = options.super_admin {
            for role in roles {
                self = self.super_admin(role);
            }
        }
        if let Some(required) = options.required_logged_in {
            self.required_logged_in = required;
        }
        if let Some(roles) = options.required_roles {
            self.required_roles = roles;
        }
        if let Some(path) = options.login_path {
            self.login_path = path;
        }
        if let Some(retrieve) = options.retrieve {
            self.retrieve = retrieve;
        }
        if let Some(save) = options.save {
            self.save = save;
        }
        if let Some(initialize) = options.initialize {
            self.initialize = initialize;
        }
        if options.unauthenticated.is_some() {
            self.unauthenticated = options.unauthenticated;
        }
        if options.unauthorized.is_some() {
            self.unauthorized = options.unauthorized;
        }
        self
    }

    /// Adds a path that bypasses the guard chain entirely.
    pub fn ignored_path(mut self, rule: impl Into<PathRule>) -> Self {
        self.ignored_paths.push(rule);
        self
    }

    /// Adds a path subject to the global login/role gates.
    pub fn secured_path(mut self, rule: impl Into<PathRule>) -> Self {
        self.secured_paths.push(rule);
        self
    }

    /// Requires secured paths to be accessed by a logged-in principal.
    pub fn required_logged_in(mut self, required: bool) -> Self {
        self.required_logged_in = required;
        self
    }

    /// Sets the role requirement of secured paths.
    pub fn required_roles(mut self, roles: impl Into<RoleExpression>) -> Self {
        self.required_roles = roles.into();
        self
    }

    /// Adds a super-admin role.
    pub fn super_admin(mut self, role: impl Into<String>) -> Self {
        let role = role.into();
        if !self.super_admin.contains(&role) {
            let mut roles = self.super_admin.to_vec();
            roles.push(role);
            self.super_admin = roles.into();
        }
        self
    }

    /// Sets the login path used by the default unauthenticated response.
    /// A value containing `://` is used as is.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Replaces how credentials are loaded.
    pub fn retrieve<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Credentials, Error>> + 'static,
    {
        self.retrieve = retrieve_fn(f);
        self
    }

    /// Replaces how credentials are persisted.
    pub fn save<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HttpRequest, bool, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + 'static,
    {
        self.save = save_fn(f);
        self
    }

    /// Replaces how roles are initialized on login.
    pub fn initialize<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Vec<String>>, Error>> + 'static,
    {
        self.initialize = initialize_fn(f);
        self
    }

    /// Replaces the response sent to principals that are not logged in.
    pub fn unauthenticated<F>(mut self, f: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.unauthenticated = Some(responder_fn(f));
        self
    }

    /// Replaces the response sent to principals lacking the required roles.
    pub fn unauthorized<F>(mut self, f: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.unauthorized = Some(responder_fn(f));
        self
    }

    pub fn ignored_paths(&self) -> &PathRules {
        &self.ignored_paths
    }

    pub fn secured_paths(&self) -> &PathRules {
        &self.secured_paths
    }

    pub fn is_login_required(&self) -> bool {
        self.required_logged_in
    }

    pub fn required_role_expression(&self) -> &RoleExpression {
        &self.required_roles
    }

    pub fn super_admin_roles(&self) -> &[String] {
        &self.super_admin
    }

    pub fn get_login_path(&self) -> &str {
        &self.login_path
    }

    pub(crate) fn retriever(&self) -> &RetrieveFn {
        &self.retrieve
    }

    /// Everything a principal of this chain is bound to, for `request`.
    pub fn principal_context(&self, request: HttpRequest) -> PrincipalContext {
        PrincipalContext::new()
            .request(request)
            .super_admin(Arc::clone(&self.super_admin))
            .save(Arc::clone(&self.save))
            .initialize(Arc::clone(&self.initialize))
    }

    /// Builds the response for a principal that is not logged in.
    pub fn unauthenticated_response(&self, req: &HttpRequest) -> HttpResponse {
        match &self.unauthenticated {
            Some(responder) => responder(req),
            None => redirect_to_login(req, &self.login_path),
        }
    }

    /// Builds the response for a principal lacking the required roles.
    pub fn unauthorized_response(&self, req: &HttpRequest) -> HttpResponse {
        match &self.unauthorized {
            Some(responder) => responder(req),
            None => forbidden(req),
        }
    }
}

impl fmt::Debug for AccessControlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControlConfig")
            .field("ignored_paths", &self.ignored_paths)
            .field("secured_paths", &self.secured_paths)
            .field("required_logged_in", &self.required_logged_in)
            .field("required_roles", &self.required_roles)
            .field("super_admin", &self.super_admin)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

/// Partial configuration supplied by the application.
///
/// Unset fields keep their default. See [`AccessControlConfig::merge`].
#[derive(Clone, Default)]
pub struct AccessControlOptions {
    pub ignored_paths: Option<PathRules>,
    pub secured_paths: Option<PathRules>,
    pub required_logged_in: Option<bool>,
    pub required_roles: Option<RoleExpression>,
    pub super_admin: Option<Vec<String>>,
    pub login_path: Option<String>,
    pub retrieve: Option<RetrieveFn>,
    pub save: Option<SaveFn>,
    pub initialize: Option<InitializeFn>,
    pub unauthenticated: Option<ResponderFn>,
    pub unauthorized: Option<ResponderFn>,
}

/// `403 Forbidden`, plain text.
pub fn forbidden(_req: &HttpRequest) -> HttpResponse {
    HttpResponse::Forbidden()
        .content_type("text/plain")
        .body("Forbidden")
}

/// `302 Found` to the login path, made absolute with the request's scheme
/// and host unless it already is.
pub fn redirect_to_login(req: &HttpRequest, login_path: &str) -> HttpResponse {
    let url = if login_path.contains("://") {
        login_path.to_string()
    } else {
        let info = req.connection_info();
        format!("{}://{}{}", info.scheme(), info.host(), login_path)
    };

    HttpResponse::Found()
        .append_header((http::header::LOCATION, url.as_str()))
        .content_type("text/html")
        .body(format!(
            "<p>Redirecting to <a href=\"{0}\">{0}</a></p>",
            url
        ))
}

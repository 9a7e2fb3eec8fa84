//! Role-based access control for Actix Web.
//!
//! # Overview
//! - [`AccessControl`] - guard chain middleware: loads credentials, attaches
//!   a [`Principal`] and protects secured paths globally
//! - [`Secure`] - per-route gate
//! - [`Principal`] - login state and roles of the current request, with an
//!   async lifecycle that persists through the configured `save`
//! - [`RoleExpression`] - nested AND/OR role requirements, built from
//!   [`Roles`] or the [`roles!`](crate::roles) macro
//!
//! # Example
//! ```ignore
//! use actix_access_control_core::http::access::{AccessControl, AccessControlConfig, Secure};
//! use actix_access_control_core::roles;
//!
//! let access = AccessControl::new(
//!     AccessControlConfig::default()
//!         .secured_path("/admin")
//!         .required_logged_in(true)
//!         .required_roles("admin"),
//! );
//!
//! App::new()
//!     .wrap(access)
//!     .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
//!     .service(
//!         web::resource("/reports")
//!             .wrap(Secure::has(roles![["admin", "analyst"]]))
//!             .to(reports),
//!     )
//! ```

mod config;
mod expression;
mod extractor;
mod gate;
mod middleware;
mod path;
mod principal;
mod secure;
mod store;

pub use config::{
    forbidden, redirect_to_login, AccessControlConfig, AccessControlOptions,
    DEFAULT_IGNORED_PATH, DEFAULT_LOGIN_PATH, DEFAULT_SUPER_ADMIN,
};
pub use expression::{evaluate, holds_any, Mode, RoleExpression, Roles};
pub use extractor::{OptionalPrincipal, PrincipalExt};
pub use gate::{chain, Decision, Requirement};
pub use middleware::{AccessControl, AccessControlService};
pub use path::{PathMatcher, PathRule, PathRules};
pub use principal::{Principal, PrincipalContext};
pub use secure::{Secure, SecureService};
pub use store::{
    initialize_fn, noop_initialize, responder_fn, retrieve_fn, save_fn, session_retrieve,
    session_save, Credentials, InitializeFn, ResponderFn, RetrieveFn, SaveFn, StoredCredentials,
    CREDENTIALS_KEY,
};

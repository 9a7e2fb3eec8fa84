//! Extractors for reaching the principal from handlers.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::access::expression::RoleExpression;
use crate::http::access::principal::{Principal, PrincipalSlot};
use crate::http::error::AccessError;

/// Extracts the principal attached by [`AccessControl`](super::AccessControl).
///
/// ```ignore
/// async fn grant(principal: Principal, role: web::Path<String>) -> actix_web::Result<String> {
///     principal.grant(role.into_inner()).await?;
///     Ok(principal.to_string())
/// }
/// ```
///
/// # Errors
/// [`AccessError::PrincipalMissing`] when `retrieve` produced no credentials
/// or the middleware is not installed.
impl FromRequest for Principal {
    type Error = AccessError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.principal().ok_or(AccessError::PrincipalMissing))
    }
}

/// Optional principal extractor, never fails.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(Option<Principal>);

impl OptionalPrincipal {
    pub fn into_inner(self) -> Option<Principal> {
        self.0
    }
}

impl Deref for OptionalPrincipal {
    type Target = Option<Principal>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalPrincipal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalPrincipal(req.principal())))
    }
}

/// Principal checks directly on the request.
pub trait PrincipalExt {
    /// Returns the principal bound to this request, if any.
    fn principal(&self) -> Option<Principal>;

    /// Returns true if a principal is attached and logged in.
    fn is_logged_in(&self) -> bool;

    /// Returns true if a principal is attached and satisfies `expr`.
    fn has_roles(&self, expr: impl Into<RoleExpression>) -> bool;
}

impl PrincipalExt for HttpRequest {
    fn principal(&self) -> Option<Principal> {
        let slot = self.extensions().get::<PrincipalSlot>().cloned();
        slot.map(|slot| slot.attach(self.clone()))
    }

    fn is_logged_in(&self) -> bool {
        self.principal().is_some_and(|p| p.is_logged_in())
    }

    fn has_roles(&self, expr: impl Into<RoleExpression>) -> bool {
        self.principal().is_some_and(|p| p.has(expr))
    }
}

impl PrincipalExt for ServiceRequest {
    fn principal(&self) -> Option<Principal> {
        self.request().principal()
    }

    fn is_logged_in(&self) -> bool {
        self.request().is_logged_in()
    }

    fn has_roles(&self, expr: impl Into<RoleExpression>) -> bool {
        self.request().has_roles(expr)
    }
}

//! Per-route gate middleware.
//!
//! [`Secure`] applies one [`Requirement`] to a resource or scope, on top of
//! (or instead of) the global protection of [`AccessControl`](super::AccessControl).
//! It relies on the principal attached by `AccessControl`.
//!
//! ```ignore
//! App::new()
//!     .wrap(AccessControl::default())
//!     .service(web::resource("/account").wrap(Secure::logged_in()).to(account))
//!     .service(web::resource("/admin").wrap(Secure::has("admin")).to(admin))
//!     .service(
//!         web::resource("/moderation")
//!             .wrap(Secure::has(roles![["admin", "moderator"]]))
//!             .wrap(Secure::logged_in())
//!             .to(moderation),
//!     );
//! ```
//!
//! Wrapping twice composes gates: the last `wrap` runs first.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, ready, LocalBoxFuture, Ready};

use crate::http::access::config::AccessControlConfig;
use crate::http::access::expression::RoleExpression;
use crate::http::access::gate::{Decision, Requirement};
use crate::http::access::principal::PrincipalSlot;
use crate::http::error::AccessError;

/// Per-route gate middleware factory.
#[derive(Clone, Debug)]
pub struct Secure {
    requirement: Arc<Requirement>,
}

impl Secure {
    /// Gate for any [`Requirement`] shorthand (`true`, `false`, roles).
    pub fn new(requirement: impl Into<Requirement>) -> Self {
        Secure {
            requirement: Arc::new(requirement.into()),
        }
    }

    /// Gate passing only logged-in principals.
    pub fn logged_in() -> Self {
        Self::new(Requirement::LoggedIn)
    }

    /// Gate passing only principals satisfying `roles`. An empty expression
    /// passes everyone.
    pub fn has(roles: impl Into<RoleExpression>) -> Self {
        Self::new(Requirement::from(roles.into()))
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

impl<S, B> Transform<S, ServiceRequest> for Secure
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecureService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecureService {
            requirement: Arc::clone(&self.requirement),
            service: Rc::new(service),
        })
    }
}

/// Per-route gate middleware service.
pub struct SecureService<S> {
    requirement: Arc<Requirement>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecureService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = if self.requirement.is_none() {
            Decision::Granted
        } else {
            let slot = req.extensions().get::<PrincipalSlot>().cloned();
            match slot {
                Some(slot) => self
                    .requirement
                    .check(&slot.attach(req.request().clone())),
                None => {
                    log::warn!("{}: route is secured but no principal is attached", req.path());
                    return Box::pin(ready(Err(AccessError::PrincipalMissing.into())));
                }
            }
        };

        if decision.is_granted() {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        let config = req
            .extensions()
            .get::<Arc<AccessControlConfig>>()
            .cloned()
            .unwrap_or_default();
        let response = match decision {
            Decision::Unauthenticated => config.unauthenticated_response(req.request()),
            _ => config.unauthorized_response(req.request()),
        };
        log::debug!("{}: denied by route gate ({:?})", req.path(), decision);

        Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
    }
}

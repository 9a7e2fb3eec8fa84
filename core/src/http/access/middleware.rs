//! Guard chain middleware for Actix Web.
//!
//! For every request [`AccessControl`]:
//!
//! 1. lets ignored paths through without loading credentials,
//! 2. calls `retrieve` and, if it returned roles, attaches a [`Principal`],
//! 3. on secured paths runs the login gate and then the role gate,
//! 4. forwards to the wrapped service.

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::access::config::{AccessControlConfig, AccessControlOptions};
use crate::http::access::gate::{self, Decision, Requirement};
use crate::http::access::principal::{Principal, PrincipalSlot};

/// Guard chain middleware factory.
///
/// The configuration is shared by every worker; clone the factory freely.
///
/// # Example
/// ```ignore
/// let access = AccessControl::new(
///     AccessControlConfig::default()
///         .secured_path(PathRule::pattern("^/admin").unwrap())
///         .required_logged_in(true)
///         .required_roles("admin"),
/// );
///
/// HttpServer::new(move || {
///     App::new()
///         .wrap(access.clone())
///         .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
/// })
/// ```
#[derive(Clone)]
pub struct AccessControl {
    config: Arc<AccessControlConfig>,
    gates: Arc<[Requirement]>,
}

impl AccessControl {
    pub fn new(config: AccessControlConfig) -> Self {
        let gates: Vec<Requirement> = vec![
            Requirement::from(config.is_login_required()),
            Requirement::from(config.required_role_expression()),
        ];
        log::debug!("access control configured: {:?}", config);

        AccessControl {
            config: Arc::new(config),
            gates: gates.into(),
        }
    }

    /// Builds the middleware from options merged onto the defaults.
    pub fn from_options(options: AccessControlOptions) -> Self {
        Self::new(AccessControlConfig::from_options(options))
    }

    pub fn config(&self) -> &AccessControlConfig {
        &self.config
    }
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new(AccessControlConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessControlService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessControlService {
            config: Arc::clone(&self.config),
            gates: Arc::clone(&self.gates),
            service: Rc::new(service),
        })
    }
}

/// Guard chain middleware service.
pub struct AccessControlService<S> {
    config: Arc<AccessControlConfig>,
    gates: Arc<[Requirement]>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessControlService<S>
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
        let service = Rc::clone(&self.service);
        let config = Arc::clone(&self.config);
        let gates = Arc::clone(&self.gates);

        // Per-route gates answer denials with the same responders
        req.extensions_mut().insert(Arc::clone(&config));

        // Step 1: Ignored paths skip the whole chain
        if config.ignored_paths().matches(req.path()) {
            log::trace!("{} is ignored by access control", req.path());
            let fut = service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        // Step 2: Load credentials
        let credentials = (config.retriever())(req.request().clone());

        Box::pin(async move {
            let credentials = credentials.await?;

            let principal = match credentials.roles {
                Some(roles) => {
                    let context = config.principal_context(req.request().clone());
                    let principal = Principal::new(credentials.logged_in, roles, context)?;
                    req.extensions_mut().insert(principal.clone().detach());
                    Some(principal)
                }
                None => {
                    log::debug!("no credentials available for {}", req.path());
                    None
                }
            };

            // Step 3: Global protection. The principal's request handle is
            // dropped before the request moves on.
            if let Some(principal) = principal {
                if config.secured_paths().matches(req.path()) {
                    let decision = gate::chain(gates.iter(), &principal);
                    drop(principal);

                    let response = match decision {
                        Decision::Granted => None,
                        Decision::Unauthenticated => {
                            log::debug!("{}: principal is not logged in", req.path());
                            Some(config.unauthenticated_response(req.request()))
                        }
                        Decision::Unauthorized => {
                            log::debug!("{}: principal lacks required roles", req.path());
                            Some(config.unauthorized_response(req.request()))
                        }
                    };
                    if let Some(response) = response {
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                }
            }

            // Step 4: Forward. The principal lives until the inner service
            // resolves; on error the request is released with its extensions.
            let res = service.call(req).await?;
            res.request().extensions_mut().remove::<PrincipalSlot>();
            Ok(res.map_into_left_body())
        })
    }
}

//! The per-request principal: login state, roles and their lifecycle.
//!
//! # Overview
//! A [`Principal`] is created by the [`AccessControl`](super::AccessControl)
//! middleware once `retrieve` returned roles for the request. Handlers get
//! it through the `Principal` extractor and mutate it with
//! [`grant`](Principal::grant), [`revoke`](Principal::revoke),
//! [`revoke_all`](Principal::revoke_all), [`login`](Principal::login) and
//! [`logout`](Principal::logout). Every mutation ends by calling the
//! configured `save` function.
//!
//! Clones share state, so a role granted in a handler is visible to every
//! gate that looks at the same request afterwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{Error, HttpRequest};

use crate::http::access::expression::{evaluate, holds_any, RoleExpression, Roles};
use crate::http::access::store::{InitializeFn, SaveFn};
use crate::http::error::AccessError;

/// Everything a principal must be bound to.
///
/// All fields start out unset. [`Principal::new`] rejects a context with any
/// field missing.
#[derive(Clone, Default)]
pub struct PrincipalContext {
    request: Option<HttpRequest>,
    super_admin: Option<Arc<[String]>>,
    save: Option<SaveFn>,
    initialize: Option<InitializeFn>,
}

impl PrincipalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(mut self, request: HttpRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn super_admin(mut self, roles: impl Into<Arc<[String]>>) -> Self {
        self.super_admin = Some(roles.into());
        self
    }

    pub fn save(mut self, save: SaveFn) -> Self {
        self.save = Some(save);
        self
    }

    pub fn initialize(mut self, initialize: InitializeFn) -> Self {
        self.initialize = Some(initialize);
        self
    }
}

struct State {
    logged_in: bool,
    roles: Vec<String>,
}

/// State shared by every handle on one request's principal. Holds no request,
/// so it can live in the request's own extensions.
pub(crate) struct Shared {
    state: RefCell<State>,
    super_admin: Arc<[String]>,
    save: SaveFn,
    initialize: InitializeFn,
}

/// Request-extension slot for the principal.
#[derive(Clone)]
pub(crate) struct PrincipalSlot(Rc<Shared>);

impl PrincipalSlot {
    /// Binds the slot to a request again.
    pub(crate) fn attach(&self, request: HttpRequest) -> Principal {
        Principal {
            request,
            shared: Rc::clone(&self.0),
        }
    }
}

/// The subject of a request.
///
/// # Example
/// ```ignore
/// async fn promote(principal: Principal) -> actix_web::Result<HttpResponse> {
///     principal.grant("moderator").await?;
///     if !principal.is_logged_in() {
///         principal.login().await?;
///     }
///     Ok(HttpResponse::Ok().finish())
/// }
/// ```
#[derive(Clone)]
pub struct Principal {
    request: HttpRequest,
    shared: Rc<Shared>,
}

impl Principal {
    /// Creates a principal bound to `context`.
    ///
    /// Duplicate roles are dropped.
    ///
    /// # Errors
    /// [`AccessError::InvalidContext`] naming the first missing field.
    pub fn new(
        logged_in: bool,
        roles: Vec<String>,
        context: PrincipalContext,
    ) -> Result<Self, AccessError> {
        let request = context
            .request
            .ok_or(AccessError::InvalidContext("request"))?;
        let super_admin = context
            .super_admin
            .ok_or(AccessError::InvalidContext("super admin roles"))?;
        let save = context.save.ok_or(AccessError::InvalidContext("save"))?;
        let initialize = context
            .initialize
            .ok_or(AccessError::InvalidContext("initialize"))?;

        let mut state = State {
            logged_in,
            roles: Vec::with_capacity(roles.len()),
        };
        for role in roles {
            add_role(&mut state.roles, role);
        }

        Ok(Principal {
            request,
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                super_admin,
                save,
                initialize,
            }),
        })
    }

    /// Drops the request binding, keeping the shared state.
    pub(crate) fn detach(self) -> PrincipalSlot {
        PrincipalSlot(self.shared)
    }

    /// The request this principal is bound to.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn is_logged_in(&self) -> bool {
        self.shared.state.borrow().logged_in
    }

    /// Returns a snapshot of the current roles.
    pub fn roles(&self) -> Vec<String> {
        self.shared.state.borrow().roles.clone()
    }

    /// The super-admin roles this principal is checked against.
    pub fn super_admin_roles(&self) -> &[String] {
        &self.shared.super_admin
    }

    /// Checks a role requirement. Super-admins satisfy every requirement.
    ///
    /// ```ignore
    /// principal.has("admin");                   // admin
    /// principal.has(vec!["a", "b"]);            // a AND b
    /// principal.has(roles!["a", ["b", "c"]]);   // a AND (b OR c)
    /// ```
    pub fn has(&self, expr: impl Into<RoleExpression>) -> bool {
        let expr = expr.into();
        let state = self.shared.state.borrow();
        evaluate(&expr, &state.roles, &self.shared.super_admin)
    }

    /// Holds at least one of the configured super-admin roles.
    pub fn is_super_admin(&self) -> bool {
        holds_any(&self.shared.state.borrow().roles, &self.shared.super_admin)
    }

    /// Adds one or more roles (nesting is flattened), then saves.
    pub async fn grant(&self, roles: impl Into<Roles>) -> Result<(), Error> {
        let roles = roles.into();
        {
            let mut state = self.shared.state.borrow_mut();
            for role in roles.flatten() {
                add_role(&mut state.roles, role.to_string());
            }
        }
        self.save().await
    }

    /// Removes one or more roles (nesting is flattened), then saves.
    /// Roles the principal does not hold are ignored.
    pub async fn revoke(&self, roles: impl Into<Roles>) -> Result<(), Error> {
        let roles = roles.into();
        {
            let mut state = self.shared.state.borrow_mut();
            for role in roles.flatten() {
                state.roles.retain(|r| r != role);
            }
        }
        self.save().await
    }

    /// Removes every role, then saves.
    pub async fn revoke_all(&self) -> Result<(), Error> {
        self.shared.state.borrow_mut().roles.clear();
        self.save().await
    }

    /// Marks the principal logged in and asks `initialize` for its roles.
    ///
    /// Roles returned by `initialize` replace the current ones; `None` keeps
    /// them. Saves afterwards.
    pub async fn login(&self) -> Result<(), Error> {
        self.shared.state.borrow_mut().logged_in = true;

        let initialized = (self.shared.initialize)(self.request.clone()).await?;
        if let Some(roles) = initialized {
            let mut state = self.shared.state.borrow_mut();
            state.roles.clear();
            for role in roles {
                add_role(&mut state.roles, role);
            }
        }
        log::debug!("principal logged in with roles {:?}", self.roles());

        self.save().await
    }

    /// Marks the principal logged out and clears its roles, then saves.
    pub async fn logout(&self) -> Result<(), Error> {
        {
            let mut state = self.shared.state.borrow_mut();
            state.logged_in = false;
            state.roles.clear();
        }
        log::debug!("principal logged out");
        self.save().await
    }

    /// Persists the current state through the configured `save` function.
    pub async fn save(&self) -> Result<(), Error> {
        let (logged_in, roles) = {
            let state = self.shared.state.borrow();
            (state.logged_in, state.roles.clone())
        };
        (self.shared.save)(self.request.clone(), logged_in, roles)
            .await
            .inspect_err(|e| log::warn!("saving credentials failed: {}", e))
    }
}

fn add_role(roles: &mut Vec<String>, role: String) {
    if !roles.contains(&role) {
        roles.push(role);
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Principal")
            .field("logged_in", &state.logged_in)
            .field("roles", &state.roles)
            .finish()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        write!(
            f,
            "Principal {{ logged_in: {}, roles: {:?} }}",
            state.logged_in, state.roles
        )
    }
}

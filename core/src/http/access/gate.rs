//! Single pass/fail checks against a principal.
//!
//! A [`Requirement`] is what a route or the global configuration demands;
//! checking it yields a [`Decision`]. [`chain`] runs several requirements in
//! order and stops at the first denial, which is how the global login gate
//! guards the global role gate.

use crate::http::access::expression::{RoleExpression, Roles};
use crate::http::access::principal::Principal;

/// What a gate demands of the principal.
///
/// Conversions follow the usual shorthand:
///
/// | value | requirement |
/// |---|---|
/// | `false`, `""`, empty list | [`Requirement::None`] |
/// | `true` | [`Requirement::LoggedIn`] |
/// | role name or nested list | [`Requirement::Roles`] |
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requirement {
    /// Always passes
    #[default]
    None,
    /// Passes iff the principal is logged in
    LoggedIn,
    /// Passes iff the principal satisfies the expression
    Roles(RoleExpression),
}

impl Requirement {
    pub fn is_none(&self) -> bool {
        matches!(self, Requirement::None)
    }

    /// Checks the requirement against `principal`.
    pub fn check(&self, principal: &Principal) -> Decision {
        match self {
            Requirement::None => Decision::Granted,
            Requirement::LoggedIn if principal.is_logged_in() => Decision::Granted,
            Requirement::LoggedIn => Decision::Unauthenticated,
            Requirement::Roles(expr) if principal.has(expr) => Decision::Granted,
            Requirement::Roles(_) => Decision::Unauthorized,
        }
    }
}

impl From<bool> for Requirement {
    fn from(logged_in: bool) -> Self {
        if logged_in {
            Requirement::LoggedIn
        } else {
            Requirement::None
        }
    }
}

impl From<RoleExpression> for Requirement {
    fn from(expr: RoleExpression) -> Self {
        if expr.is_empty() {
            Requirement::None
        } else {
            Requirement::Roles(expr)
        }
    }
}

impl From<&RoleExpression> for Requirement {
    fn from(expr: &RoleExpression) -> Self {
        Requirement::from(expr.clone())
    }
}

impl From<Roles> for Requirement {
    fn from(roles: Roles) -> Self {
        Requirement::from(RoleExpression::parse(roles))
    }
}

impl From<&str> for Requirement {
    fn from(role: &str) -> Self {
        Requirement::from(RoleExpression::from(role))
    }
}

impl From<String> for Requirement {
    fn from(role: String) -> Self {
        Requirement::from(RoleExpression::from(role))
    }
}

impl<T: Into<Roles>> From<Vec<T>> for Requirement {
    fn from(items: Vec<T>) -> Self {
        Requirement::from(RoleExpression::parse(items))
    }
}

impl<T: Into<Roles>, const N: usize> From<[T; N]> for Requirement {
    fn from(items: [T; N]) -> Self {
        Requirement::from(RoleExpression::parse(items))
    }
}

/// Outcome of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue to the next step
    Granted,
    /// The principal must log in first
    Unauthenticated,
    /// The principal lacks the required roles
    Unauthorized,
}

impl Decision {
    pub fn is_granted(self) -> bool {
        self == Decision::Granted
    }
}

/// Checks `requirements` in order, stopping at the first one not granted.
pub fn chain<'a, I>(requirements: I, principal: &Principal) -> Decision
where
    I: IntoIterator<Item = &'a Requirement>,
{
    for requirement in requirements {
        let decision = requirement.check(principal);
        if !decision.is_granted() {
            return decision;
        }
    }
    Decision::Granted
}

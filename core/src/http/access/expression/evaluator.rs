//! Expression evaluator.
//!
//! Evaluates a [`RoleExpression`] against a principal's role set.

use super::ast::{Mode, RoleExpression};

/// Evaluates `expr` against `roles`, letting any super-admin role satisfy it.
///
/// The super-admin check runs once, before the tree is walked, so a
/// super-admin passes every requirement including an empty one.
pub fn evaluate(expr: &RoleExpression, roles: &[String], super_admin: &[String]) -> bool {
    holds_any(roles, super_admin) || expr.matches(roles)
}

/// Returns true if `roles` contains at least one of `candidates`.
pub fn holds_any(roles: &[String], candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| roles.contains(candidate))
}

impl RoleExpression {
    /// Evaluates the expression without any super-admin override.
    ///
    /// Role names are compared case-sensitively. AND groups stop at the first
    /// failing child and hold when empty; OR groups stop at the first passing
    /// child and fail when empty.
    pub fn matches(&self, roles: &[String]) -> bool {
        match self {
            RoleExpression::Atom(role) => roles.iter().any(|r| r == role),
            RoleExpression::Group {
                mode: Mode::All,
                children,
            } => children.iter().all(|child| child.matches(roles)),
            RoleExpression::Group {
                mode: Mode::Any,
                children,
            } => children.iter().any(|child| child.matches(roles)),
        }
    }
}

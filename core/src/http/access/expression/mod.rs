//! Nested boolean role requirements.
//!
//! # Overview
//! Requirements are written as nested lists of role names. Nesting alternates
//! the operator, starting with AND at the top:
//!
//! - `"admin"` - the principal holds `admin`
//! - `["a", "b"]` - `a` AND `b`
//! - `["a", ["b", "c"]]` - `a` AND (`b` OR `c`)
//! - `[["a", "b"]]` - `a` OR `b`
//! - `["a", ["b", ["c", "d"]]]` - `a` AND (`b` OR (`c` AND `d`))
//!
//! Parsing ([`Roles`] into [`RoleExpression`]) and evaluation are separate
//! steps, so a requirement configured once is parsed once.

mod ast;
mod evaluator;
mod parser;

pub use ast::{Mode, RoleExpression, Roles};
pub use evaluator::{evaluate, holds_any};

/// Builds a [`Roles`] value from nested, bracketed role names.
///
/// ```
/// use actix_access_control_core::roles;
/// use actix_access_control_core::http::access::Roles;
///
/// let roles = roles!["admin", ["moderator", "editor"]];
/// assert_eq!(
///     roles,
///     Roles::Many(vec![
///         Roles::from("admin"),
///         Roles::Many(vec![Roles::from("moderator"), Roles::from("editor")]),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! roles {
    (@item [$($inner:tt),* $(,)?]) => {
        $crate::http::access::Roles::Many(::std::vec![$($crate::roles!(@item $inner)),*])
    };
    (@item $role:expr) => {
        $crate::http::access::Roles::from($role)
    };
    ($($item:tt),* $(,)?) => {
        $crate::http::access::Roles::Many(::std::vec![$($crate::roles!(@item $item)),*])
    };
}

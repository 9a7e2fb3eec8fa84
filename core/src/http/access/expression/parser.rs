//! Turns caller-written [`Roles`] into a [`RoleExpression`].

use super::ast::{Mode, RoleExpression, Roles};

impl RoleExpression {
    /// Parses a raw requirement, assigning each list its operator by depth.
    ///
    /// A single role becomes an [`RoleExpression::Atom`]. A top-level list is
    /// an AND group, a list nested in it an OR group, alternating from there.
    ///
    /// # Example
    /// ```
    /// use actix_access_control_core::roles;
    /// use actix_access_control_core::http::access::{Mode, RoleExpression};
    ///
    /// let expr = RoleExpression::parse(roles!["a", ["b", "c"]]);
    /// match expr {
    ///     RoleExpression::Group { mode, children } => {
    ///         assert_eq!(mode, Mode::All);
    ///         assert_eq!(children.len(), 2);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn parse(roles: impl Into<Roles>) -> Self {
        build(roles.into(), Mode::All)
    }
}

fn build(roles: Roles, mode: Mode) -> RoleExpression {
    match roles {
        Roles::One(role) => RoleExpression::Atom(role),
        Roles::Many(items) => RoleExpression::Group {
            mode,
            children: items
                .into_iter()
                .map(|item| build(item, mode.flip()))
                .collect(),
        },
    }
}

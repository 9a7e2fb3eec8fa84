//! Role requirement trees.

use std::fmt;

/// How the children of a [`RoleExpression::Group`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every child must hold (logical AND)
    All,
    /// At least one child must hold (logical OR)
    Any,
}

impl Mode {
    /// Returns the mode of a group nested directly inside a group of this mode.
    pub fn flip(self) -> Self {
        match self {
            Mode::All => Mode::Any,
            Mode::Any => Mode::All,
        }
    }
}

/// A role requirement as callers write it: a single role or a nested list.
///
/// Lists carry no operator. The operator of each list is decided by its
/// depth when the requirement is turned into a [`RoleExpression`].
///
/// Use the [`roles!`](crate::roles) macro to write mixed nesting:
/// ```
/// use actix_access_control_core::roles;
/// use actix_access_control_core::http::access::Roles;
///
/// let roles = roles!["admin", ["moderator", "editor"]];
/// assert_eq!(roles.flatten(), vec!["admin", "moderator", "editor"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roles {
    /// A single role identifier
    One(String),
    /// A nested list of requirements
    Many(Vec<Roles>),
}

impl Roles {
    /// Returns true for an empty list or an empty role name.
    pub fn is_empty(&self) -> bool {
        match self {
            Roles::One(role) => role.is_empty(),
            Roles::Many(items) => items.is_empty(),
        }
    }

    /// Collects every role identifier, depth first, ignoring the nesting.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Roles::One(role) => out.push(role),
            Roles::Many(items) => items.iter().for_each(|item| item.collect(out)),
        }
    }
}

impl From<&str> for Roles {
    fn from(role: &str) -> Self {
        Roles::One(role.to_string())
    }
}

impl From<String> for Roles {
    fn from(role: String) -> Self {
        Roles::One(role)
    }
}

impl From<&String> for Roles {
    fn from(role: &String) -> Self {
        Roles::One(role.clone())
    }
}

impl<T: Into<Roles>> From<Vec<T>> for Roles {
    fn from(items: Vec<T>) -> Self {
        Roles::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Roles>, const N: usize> From<[T; N]> for Roles {
    fn from(items: [T; N]) -> Self {
        Roles::Many(items.into_iter().map(Into::into).collect())
    }
}

/// A role requirement with an explicit operator on every group.
///
/// Built from [`Roles`] by [`RoleExpression::parse`]: the top-level list is
/// [`Mode::All`], lists nested one level deeper are [`Mode::Any`], and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleExpression {
    /// Holds iff the role is held
    Atom(String),
    /// Combines its children with `mode`
    Group {
        mode: Mode,
        children: Vec<RoleExpression>,
    },
}

impl RoleExpression {
    /// An expression that requires nothing.
    pub fn empty() -> Self {
        RoleExpression::Group {
            mode: Mode::All,
            children: Vec::new(),
        }
    }

    /// Returns true for a group without children or an empty role name.
    pub fn is_empty(&self) -> bool {
        match self {
            RoleExpression::Atom(role) => role.is_empty(),
            RoleExpression::Group { children, .. } => children.is_empty(),
        }
    }
}

impl Default for RoleExpression {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Roles> for RoleExpression {
    fn from(roles: Roles) -> Self {
        RoleExpression::parse(roles)
    }
}

impl From<&RoleExpression> for RoleExpression {
    fn from(expr: &RoleExpression) -> Self {
        expr.clone()
    }
}

impl From<&str> for RoleExpression {
    fn from(role: &str) -> Self {
        RoleExpression::Atom(role.to_string())
    }
}

impl From<String> for RoleExpression {
    fn from(role: String) -> Self {
        RoleExpression::Atom(role)
    }
}

impl<T: Into<Roles>> From<Vec<T>> for RoleExpression {
    fn from(items: Vec<T>) -> Self {
        RoleExpression::parse(items)
    }
}

impl<T: Into<Roles>, const N: usize> From<[T; N]> for RoleExpression {
    fn from(items: [T; N]) -> Self {
        RoleExpression::parse(items)
    }
}

impl fmt::Display for RoleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleExpression::Atom(role) => write!(f, "'{}'", role),
            RoleExpression::Group { mode, children } => {
                let op = match mode {
                    Mode::All => " AND ",
                    Mode::Any => " OR ",
                };
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(op)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

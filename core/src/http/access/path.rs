//! Request path rules for ignored and secured paths.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Anything that can decide whether it covers a request path.
pub trait PathMatcher: Send + Sync {
    fn matches(&self, path: &str) -> bool;
}

impl<F> PathMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, path: &str) -> bool {
        self(path)
    }
}

/// A single path rule.
///
/// # Example
/// ```
/// use actix_access_control_core::http::access::PathRule;
///
/// assert!(PathRule::exact("/favicon.ico").matches("/favicon.ico"));
/// assert!(!PathRule::exact("/admin").matches("/admin/users"));
///
/// let rule = PathRule::pattern("^/admin(/|$)").unwrap();
/// assert!(rule.matches("/admin/users"));
/// ```
#[derive(Clone)]
pub enum PathRule {
    /// Matches one literal path exactly
    Exact(String),
    /// Matches when the regex finds a match anywhere in the path
    Pattern(Regex),
    /// Delegates to a caller-provided matcher
    Custom(Arc<dyn PathMatcher>),
}

impl PathRule {
    pub fn exact(path: impl Into<String>) -> Self {
        PathRule::Exact(path.into())
    }

    /// Compiles `pattern` into a [`PathRule::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(PathRule::Pattern)
    }

    pub fn custom<M: PathMatcher + 'static>(matcher: M) -> Self {
        PathRule::Custom(Arc::new(matcher))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathRule::Exact(literal) => literal == path,
            PathRule::Pattern(re) => re.is_match(path),
            PathRule::Custom(matcher) => matcher.matches(path),
        }
    }

    /// Rules are the same if they are the same literal or the same pattern
    /// source. Custom matchers are only the same as themselves.
    fn same_as(&self, other: &PathRule) -> bool {
        match (self, other) {
            (PathRule::Exact(a), PathRule::Exact(b)) => a == b,
            (PathRule::Pattern(a), PathRule::Pattern(b)) => a.as_str() == b.as_str(),
            (PathRule::Custom(a), PathRule::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathRule::Exact(literal) => f.debug_tuple("Exact").field(literal).finish(),
            PathRule::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            PathRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for PathRule {
    fn from(path: &str) -> Self {
        PathRule::exact(path)
    }
}

impl From<String> for PathRule {
    fn from(path: String) -> Self {
        PathRule::Exact(path)
    }
}

impl From<Regex> for PathRule {
    fn from(re: Regex) -> Self {
        PathRule::Pattern(re)
    }
}

/// An unordered set of path rules. A path matches if any rule matches.
#[derive(Clone, Debug, Default)]
pub struct PathRules {
    rules: Vec<PathRule>,
}

impl PathRules {
    pub fn new() -> Self {
        PathRules { rules: Vec::new() }
    }

    /// Adds a rule unless an identical one is already present.
    pub fn push(&mut self, rule: impl Into<PathRule>) {
        let rule = rule.into();
        if !self.rules.iter().any(|r| r.same_as(&rule)) {
            self.rules.push(rule);
        }
    }

    /// Builder form of [`PathRules::push`].
    pub fn with(mut self, rule: impl Into<PathRule>) -> Self {
        self.push(rule);
        self
    }

    /// Union of both lists, first occurrence wins.
    pub fn merge(mut self, other: PathRules) -> Self {
        for rule in other.rules {
            self.push(rule);
        }
        self
    }

    pub fn matches(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathRule> {
        self.rules.iter()
    }
}

impl<R: Into<PathRule>> FromIterator<R> for PathRules {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut rules = PathRules::new();
        for rule in iter {
            rules.push(rule);
        }
        rules
    }
}

// ============================
// backend-lib/src/policy.rs
// ============================
//! Route classification and the allow/redirect decision.
//!
//! All role gating for page navigation lives here. Pages never check roles
//! themselves.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use thiserror::Error;
use whathefood_common::{Identity, Role};

use crate::config::LandingSettings;

/// Access level of a path
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Anyone
    Public,
    /// Only while signed out (login, register)
    AuthOnly,
    /// Any signed-in account
    AuthenticatedRequired,
    /// Signed-in `ADMIN` only
    AdminRequired,
}

/// One row of the classification table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub class: RouteClass,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, class: RouteClass) -> Self {
        Self {
            prefix: prefix.into(),
            class,
        }
    }
}

/// The observed routing policy of the recipe site
pub fn default_rules() -> Vec<RouteRule> {
    use RouteClass::*;
    vec![
        RouteRule::new("/", Public),
        RouteRule::new("/login", AuthOnly),
        RouteRule::new("/register", AuthOnly),
        RouteRule::new("/dashboard", AuthenticatedRequired),
        RouteRule::new("/profile", AuthenticatedRequired),
        RouteRule::new("/admin", AdminRequired),
        RouteRule::new("/tasks", AdminRequired),
        RouteRule::new("/users", AdminRequired),
        RouteRule::new("/dishes", AdminRequired),
        // API handlers and static assets sit outside page gating
        RouteRule::new("/api", Public),
        RouteRule::new("/images", Public),
        RouteRule::new("/_next", Public),
        RouteRule::new("/favicon.ico", Public),
    ]
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("route prefix must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("route prefix {0:?} is listed more than once")]
    Duplicate(String),

    #[error("route table has no \"/\" rule, some paths would be unclassified")]
    MissingRoot,
}

/// Validated classification table
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    root: RouteClass,
    /// Non-root rules, longest prefix first
    rules: Vec<(String, RouteClass)>,
}

impl RoutePolicy {
    pub fn new(rules: &[RouteRule]) -> Result<Self, PolicyError> {
        let mut seen = HashSet::new();
        let mut root = None;
        let mut specific = Vec::new();

        for rule in rules {
            if !rule.prefix.starts_with('/') {
                return Err(PolicyError::NotAbsolute(rule.prefix.clone()));
            }
            let prefix = trim_trailing_slash(&rule.prefix).to_string();
            if !seen.insert(prefix.clone()) {
                return Err(PolicyError::Duplicate(prefix));
            }
            if prefix == "/" {
                root = Some(rule.class);
            } else {
                specific.push((prefix, rule.class));
            }
        }

        specific.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self {
            root: root.ok_or(PolicyError::MissingRoot)?,
            rules: specific,
        })
    }

    /// Longest matching prefix wins; prefixes only match on segment boundaries.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = canonical_path(path);
        self.rules
            .iter()
            .find(|(prefix, _)| segment_prefix(&path, prefix))
            .map_or(self.root, |(_, class)| *class)
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        // default_rules() always has a root and no duplicates
        Self::new(&default_rules()).unwrap_or(Self {
            root: RouteClass::Public,
            rules: Vec::new(),
        })
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn segment_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Percent-decode, drop empty and `.` segments, resolve `..`.
///
/// Classification has to see the same path the file server will, otherwise
/// `/%61dmin` or `/x/../admin` would slip past an `/admin` rule.
pub fn canonical_path(raw: &str) -> String {
    let decoded: Cow<'_, str> = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Allow,
    Redirect(&'a str),
}

/// The authorization decision table.
///
/// Anonymous callers are always sent to the login page, never told a page is
/// forbidden. Signed-in callers who may not see a page go to their own home.
pub fn decide<'a>(class: RouteClass, identity: &Identity, landing: &'a LandingSettings) -> Decision<'a> {
    match (class, identity.role()) {
        (RouteClass::Public, _) => Decision::Allow,

        (RouteClass::AuthOnly, None) => Decision::Allow,
        (RouteClass::AuthOnly, Some(role)) => Decision::Redirect(landing.home.for_role(role)),

        (RouteClass::AuthenticatedRequired, None) => Decision::Redirect(&landing.login),
        (RouteClass::AuthenticatedRequired, Some(_)) => Decision::Allow,

        (RouteClass::AdminRequired, None) => Decision::Redirect(&landing.login),
        (RouteClass::AdminRequired, Some(Role::User)) => Decision::Redirect(&landing.home.user),
        (RouteClass::AdminRequired, Some(Role::Admin)) => Decision::Allow,
    }
}

//! Post-login navigation.

use crate::{ClaimSet, Role};
use serde::{Deserialize, Serialize};

/// Role landing pages
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LandingPaths {
    /// Admin console
    pub admin: String,
    /// Standard user dashboard
    pub user: String,
}

impl Default for LandingPaths {
    fn default() -> Self {
        Self {
            admin: "/admin/dashboard".to_string(),
            user: "/dashboard".to_string(),
        }
    }
}

impl LandingPaths {
    pub fn for_role(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin,
            Role::User => &self.user,
        }
    }
}

/// Pick the first screen after a successful login.
///
/// Only call this with the claims of a session the server just issued.
pub fn on_login_success<'a>(claims: &ClaimSet, landing: &'a LandingPaths) -> &'a str {
    landing.for_role(claims.role)
}

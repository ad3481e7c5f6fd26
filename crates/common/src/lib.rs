// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the WhatTheFood browser client and the auth server.
//! This module defines the account, session and login wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub mod router;

pub use router::{on_login_success, LandingPaths};

/// Access level of an account. Exactly one per account.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A registered user's public identity. The credential hash never travels
/// in this type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Unique, compared exactly as stored
    pub email: String,
    pub display_name: String,
    /// Pointer to the avatar image resource, if any
    pub avatar_ref: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// A fresh account with a new id, stamped with the current time
    pub fn new(email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            display_name: display_name.into(),
            avatar_ref: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity facts carried inside a session token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub subject_id: Uuid,
    pub role: Role,
    pub display_name: String,
    pub avatar_ref: Option<String>,
}

impl From<&Account> for ClaimSet {
    fn from(account: &Account) -> Self {
        Self {
            subject_id: account.id,
            role: account.role,
            display_name: account.display_name.clone(),
            avatar_ref: account.avatar_ref.clone(),
        }
    }
}

/// Who is making a request, as far as the session token says.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(ClaimSet),
}

impl Identity {
    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(claims) => Some(claims),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.claims().map(|c| c.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// Body of `POST /api/auth/login`.
///
/// Missing fields deserialize as empty strings, which the server rejects the
/// same way as a wrong password.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Reply to a login attempt
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    /// The session cookie was attached to the response
    /// # Fields
    /// * `user` - Claims embedded in the new session
    /// * `redirect` - Landing path picked for the user's role
    Success { user: ClaimSet, redirect: String },
    /// Generic failure, never says which field was wrong
    Failure { error: String },
}

impl LoginResponse {
    /// Where the client should navigate after this response, if anywhere.
    pub fn navigation_target<'a>(&'a self, landing: &'a LandingPaths) -> Option<&'a str> {
        match self {
            LoginResponse::Success { user, .. } => Some(on_login_success(user, landing)),
            LoginResponse::Failure { .. } => None,
        }
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checked against `password` when the form sends it
    #[serde(default)]
    pub confirm_password: Option<String>,
}

// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the WhatTheFood server: accounts,
//! sessions and page authorization.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod policy;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, DefaultAuth, SessionIssuer, SessionKeys, SessionReader};
use crate::config::{ConfigError, Settings};
use crate::policy::RoutePolicy;
use crate::storage::UserStore;

pub use router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session reader
    pub sessions: Arc<SessionReader>,
    /// Page classification table
    pub policy: Arc<RoutePolicy>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build the state from validated settings
    pub fn new(store: Arc<dyn UserStore>, settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let policy = settings.route_policy()?;

        let keys = Arc::new(SessionKeys::from_secret(settings.session.secret.as_bytes()));
        let issuer = SessionIssuer::new(keys.clone(), Duration::from_secs(settings.session.ttl_secs));
        let sessions = SessionReader::new(keys, settings.session.cookie_name.clone());
        let auth = DefaultAuth::new(store, issuer, settings.password.clone());

        Ok(Self {
            auth: Arc::new(auth),
            sessions: Arc::new(sessions),
            policy: Arc::new(policy),
            settings: Arc::new(settings),
        })
    }
}

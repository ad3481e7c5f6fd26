// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const REGISTERED: &str = "auth.registered";
pub const ROUTE_ALLOWED: &str = "route.allowed";
pub const ROUTE_REDIRECTED: &str = "route.redirected";

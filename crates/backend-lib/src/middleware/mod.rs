// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the WhatTheFood server.

pub mod authorize;

pub use authorize::authorize;

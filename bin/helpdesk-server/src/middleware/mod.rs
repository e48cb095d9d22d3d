//! HTTP middleware stack: CORS, per-request tracing, admin bearer auth.

pub mod auth;
pub mod cors;
pub mod trace;

//! HTTP surface: router, session middleware, and JSON error mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

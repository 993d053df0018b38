//! HTTP middleware layers applied around every route.

pub mod cors;
pub mod tracing_layer;

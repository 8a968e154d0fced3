//! HTTP middleware layered around the report routes.

pub mod security_headers;

//! Tower middleware layers applied to the whole router.
//!
//! [`cors`] answers preflight requests and stamps the permissive CORS
//! headers on every response. Request tracing and the body size limit
//! come straight from `tower-http` in [`server::build_router`](crate::server::build_router).

pub mod cors;

//! # Catalog Proxy Library
//!
//! Fronts a supplier catalog API: keeps a bearer token for the upstream,
//! re-authenticates once on 401 and serves the nested category tree as a
//! flat JSON contract for a storefront.
//!
//! Modules:
//! - `config` — service configuration, loading and validation
//! - `cache` — cached upstream token
//! - `upstream` — token manager and authenticated request gateway
//! - `parser` — extracting the token from login responses
//! - `catalog` — catalog queries and response shaping
//! - `server` — public HTTP routes

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod resilience;
pub mod server;
pub mod upstream;
pub mod utils;
#[cfg(test)]
pub mod tests;


pub use crate::config::upstream::ServiceConfig;
pub use crate::error::ProxyError;
pub use crate::upstream::{TokenManager, UpstreamGateway, UpstreamRequest};

//! Authenticated access to the supplier API.
//!
//! `TokenManager` owns the bearer token lifecycle, `UpstreamGateway` performs
//! the calls and re-authenticates once on 401.

pub mod gateway;
pub mod request;
pub mod token_manager;

pub use gateway::UpstreamGateway;
pub use request::UpstreamRequest;
pub use token_manager::TokenManager;

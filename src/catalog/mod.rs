//! Catalog requests and the flat storefront contract.

pub mod client;
pub mod flatten;
pub mod models;
pub mod product;
pub mod query;

pub use client::{CatalogClient, ProductFilter};

pub mod config;
pub mod fetch;
pub mod observability;
pub mod reshape;
pub mod web;

pub use fetch::{CachedStore, DemandStore, PgDemandStore};

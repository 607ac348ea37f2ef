//! Pizzeria - a small pizza ordering service
//!
//! - HTTP API for pizzas, orders and deliveries
//! - Document store over pluggable storage (in-memory or local files)
//! - Health and home page service profiles

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{Error, Result};

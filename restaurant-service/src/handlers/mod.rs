//! HTTP handlers for restaurant-service.

pub mod health;
pub mod restaurants;

pub use health::{health_check, metrics_endpoint};
pub use restaurants::search_restaurants;

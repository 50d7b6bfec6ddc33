//! Hotel booking API with a content-based similarity recommender.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod recommender;
pub mod services;
pub mod store;

//! Geoplaces - adaptive proximity search for nearby points of interest
//!
//! This library finds places around a coordinate (or matching a free-text
//! query) through an external search provider, then filters, deduplicates
//! and ranks them by great-circle distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    haversine_distance, EngineSettings, KeywordPolicy, PlaceSet, RelevanceFilter, SearchEngine,
    SearchError,
};
pub use models::{ArticleDetails, Candidate, Coordinate, RankedPlace};
pub use services::{ProviderError, SearchProvider, WikipediaClient};

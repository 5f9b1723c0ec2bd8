// Service exports
pub mod provider;
pub mod wikipedia;

pub use provider::{ProviderError, SearchProvider};
pub use wikipedia::WikipediaClient;

// Core algorithm exports
pub mod aggregator;
pub mod distance;
pub mod engine;
pub mod relevance;

pub use aggregator::PlaceSet;
pub use distance::{format_distance, haversine_distance, EARTH_RADIUS_M};
pub use engine::{EngineSettings, SearchEngine, SearchError, SearchMode, SessionState};
pub use relevance::{FilterError, KeywordPolicy, RelevanceFilter};

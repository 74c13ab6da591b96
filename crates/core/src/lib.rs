pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{RecommenderError, RecommenderResult};
pub use types::{canonical_id, FitSummary, Item, ModelState, Rating, Recommendation, UNKNOWN_TITLE};

//! Catalog recommendations — TF-IDF content similarity, user-based
//! collaborative filtering, dataset loading, and the service tying them
//! together.

pub mod catalog;
pub mod collaborative;
pub mod content;
pub mod dataset;
pub mod neighbors;
pub mod recommendations;
pub mod text;

pub use catalog::{Catalog, CatalogEntry, CatalogLookup};
pub use collaborative::CollaborativeRecommender;
pub use content::ItemCatalogIndex;
pub use neighbors::{BruteForceIndex, Neighbor, NeighborIndex};
pub use recommendations::{Recommendations, RecommenderService, TrainingReport};
pub use text::TfidfVectorizer;

//! Recommender service: trains both engines together and answers combined
//! queries against the most recent successful training.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use recsys_core::{
    AppConfig, FitSummary, Item, ModelState, Rating, Recommendation, RecommenderError,
    RecommenderResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogEntry, CatalogLookup};
use crate::collaborative::CollaborativeRecommender;
use crate::content::ItemCatalogIndex;
use crate::dataset;

/// Outcome of a successful training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub content: FitSummary,
    pub collaborative: FitSummary,
    /// Distinct user ids, ascending.
    pub users: Vec<String>,
    pub items: Vec<CatalogEntry>,
}

/// Combined answer for one user and one anchor item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub collaborative: Vec<Recommendation>,
    pub content_based: Vec<Recommendation>,
}

struct TrainedModels {
    content: ItemCatalogIndex,
    collaborative: CollaborativeRecommender,
    catalog: Catalog,
}

pub struct RecommenderService {
    english_stop_words: bool,
    k_neighbors: usize,
    state: Arc<RwLock<ModelState<TrainedModels>>>,
}

impl RecommenderService {
    pub fn new(english_stop_words: bool, k_neighbors: usize) -> Self {
        Self {
            english_stop_words,
            k_neighbors,
            state: Arc::new(RwLock::new(ModelState::Untrained)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.content.english_stop_words,
            config.collaborative.k_neighbors,
        )
    }

    pub fn is_trained(&self) -> bool {
        self.state.read().is_trained()
    }

    /// Fit both engines on fresh data. The new models replace the current
    /// ones only when both fits succeed.
    pub fn train(&self, items: &[Item], ratings: &[Rating]) -> RecommenderResult<TrainingReport> {
        let mut content = ItemCatalogIndex::new(self.english_stop_words);
        let content_summary = content.fit(items)?;

        let mut collaborative = CollaborativeRecommender::new(self.k_neighbors);
        let collaborative_summary = collaborative.fit(ratings)?;

        let catalog = Catalog::from_items(items);
        let report = TrainingReport {
            content: content_summary,
            collaborative: collaborative_summary,
            users: collaborative.users().to_vec(),
            items: catalog.entries().to_vec(),
        };

        *self.state.write() = ModelState::Trained(TrainedModels {
            content,
            collaborative,
            catalog,
        });

        info!(
            items = report.items.len(),
            users = report.users.len(),
            "Recommender trained"
        );
        Ok(report)
    }

    pub fn train_from_paths(
        &self,
        items_path: impl AsRef<Path>,
        ratings_path: impl AsRef<Path>,
    ) -> RecommenderResult<TrainingReport> {
        let items = dataset::load_items_from_path(items_path.as_ref())?;
        let ratings = dataset::load_ratings_from_path(ratings_path.as_ref())?;
        debug!(
            items_path = %items_path.as_ref().display(),
            ratings_path = %ratings_path.as_ref().display(),
            "Datasets loaded"
        );
        self.train(&items, &ratings)
    }

    /// Both engines' results: peers' favourites for `user_id` and items
    /// similar to `item_id`.
    pub fn recommend(
        &self,
        user_id: &str,
        item_id: &str,
        n: usize,
    ) -> RecommenderResult<Recommendations> {
        let guard = self.state.read();
        let models = guard.trained().ok_or(RecommenderError::NotTrained)?;
        Ok(Recommendations {
            collaborative: models.collaborative.get_recommendations(
                user_id,
                n,
                Some(&models.catalog as &dyn CatalogLookup),
            ),
            content_based: models.content.get_recommendations(item_id, n),
        })
    }

    pub fn recommend_similar_items(
        &self,
        item_id: &str,
        n: usize,
    ) -> RecommenderResult<Vec<Recommendation>> {
        let guard = self.state.read();
        let models = guard.trained().ok_or(RecommenderError::NotTrained)?;
        Ok(models.content.get_recommendations(item_id, n))
    }

    pub fn recommend_for_user(
        &self,
        user_id: &str,
        n: usize,
    ) -> RecommenderResult<Vec<Recommendation>> {
        let guard = self.state.read();
        let models = guard.trained().ok_or(RecommenderError::NotTrained)?;
        Ok(models.collaborative.get_recommendations(
            user_id,
            n,
            Some(&models.catalog as &dyn CatalogLookup),
        ))
    }
}

impl Default for RecommenderService {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Clone for RecommenderService {
    fn clone(&self) -> Self {
        Self {
            english_stop_words: self.english_stop_words,
            k_neighbors: self.k_neighbors,
            state: Arc::clone(&self.state),
        }
    }
}

//! User-based collaborative filtering over a dense rating matrix.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use recsys_core::{
    canonical_id, FitSummary, ModelState, Rating, Recommendation, RecommenderError,
    RecommenderResult, UNKNOWN_TITLE,
};
use tracing::{debug, info, warn};

use crate::catalog::CatalogLookup;
use crate::neighbors::{BruteForceIndex, NeighborIndex};

struct RatingModel {
    matrix: Array2<f64>,
    users: Vec<String>,
    user_index: HashMap<String, usize>,
    item_ids: Vec<String>,
    index: Box<dyn NeighborIndex>,
}

/// Recommends items that a user's nearest peers rated highly.
pub struct CollaborativeRecommender {
    k_neighbors: usize,
    state: ModelState<RatingModel>,
}

impl Default for CollaborativeRecommender {
    fn default() -> Self {
        Self::new(11)
    }
}

impl CollaborativeRecommender {
    /// `k_neighbors` counts the querying user itself; values below 1 are
    /// treated as 1.
    pub fn new(k_neighbors: usize) -> Self {
        Self {
            k_neighbors: k_neighbors.max(1),
            state: ModelState::Untrained,
        }
    }

    pub fn k_neighbors(&self) -> usize {
        self.k_neighbors
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_trained()
    }

    /// Pivot ratings into a user by item matrix and build the neighbor index.
    pub fn fit(&mut self, ratings: &[Rating]) -> RecommenderResult<FitSummary> {
        for (pos, r) in ratings.iter().enumerate() {
            if r.user_id.trim().is_empty() || r.item_id.trim().is_empty() {
                return Err(RecommenderError::DatasetFormat(format!(
                    "rating at position {} has an empty id",
                    pos
                )));
            }
            if !r.rating.is_finite() {
                return Err(RecommenderError::DatasetFormat(format!(
                    "rating at position {} is not a finite number",
                    pos
                )));
            }
        }

        let users: Vec<String> = ratings
            .iter()
            .map(|r| canonical_id(&r.user_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_ids: Vec<String> = ratings
            .iter()
            .map(|r| canonical_id(&r.item_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let user_index: HashMap<String, usize> = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect();
        let item_index: HashMap<&str, usize> = item_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut sums = Array2::<f64>::zeros((users.len(), item_ids.len()));
        let mut counts = Array2::<f64>::zeros((users.len(), item_ids.len()));
        for r in ratings {
            let row = user_index[&canonical_id(&r.user_id)];
            let col = item_index[canonical_id(&r.item_id).as_str()];
            sums[[row, col]] += r.rating;
            counts[[row, col]] += 1.0;
        }
        let matrix = ndarray::Zip::from(&sums)
            .and(&counts)
            .map_collect(|s, c| if *c > 0.0 { s / c } else { 0.0 });

        let index: Box<dyn NeighborIndex> = Box::new(BruteForceIndex::build(&matrix));
        let summary = FitSummary::new("collaborative", users.len(), item_ids.len());
        self.state = ModelState::Trained(RatingModel {
            matrix,
            users,
            user_index,
            item_ids,
            index,
        });

        info!(
            model_id = %summary.model_id,
            users = summary.rows,
            items = summary.columns,
            ratings = ratings.len(),
            k_neighbors = self.k_neighbors,
            "Collaborative model fitted"
        );
        Ok(summary)
    }

    /// Top `n` unrated items by mean peer rating. Titles come from `catalog`;
    /// ids it does not know are dropped. Without a catalog every title is
    /// `"N/A"`.
    pub fn get_recommendations(
        &self,
        user_id: &str,
        n: usize,
        catalog: Option<&dyn CatalogLookup>,
    ) -> Vec<Recommendation> {
        let Some(model) = self.state.trained() else {
            return Vec::new();
        };
        let user = canonical_id(user_id);
        let Some(&row) = model.user_index.get(&user) else {
            warn!(user_id = %user, "Unknown user");
            return Vec::new();
        };

        let peers = model.index.kneighbors(row, self.k_neighbors - 1);
        if peers.is_empty() || n == 0 {
            return Vec::new();
        }
        debug!(user_id = %user, peers = peers.len(), "Neighbors found");

        let mut means = vec![0.0; model.item_ids.len()];
        for peer in &peers {
            for (mean, value) in means.iter_mut().zip(model.matrix.row(peer.row)) {
                *mean += value;
            }
        }
        let peer_count = peers.len() as f64;

        let own = model.matrix.row(row);
        let mut candidates: Vec<(usize, f64)> = means
            .into_iter()
            .map(|sum| sum / peer_count)
            .enumerate()
            .filter(|(col, _)| own[*col] <= 0.0)
            .collect();
        // Stable sort keeps column order among equal means.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.truncate(n);

        candidates
            .into_iter()
            .filter_map(|(col, _)| {
                let item_id = &model.item_ids[col];
                let title = match catalog {
                    Some(lookup) => lookup.title(item_id)?.to_string(),
                    None => UNKNOWN_TITLE.to_string(),
                };
                Some(Recommendation {
                    item_id: item_id.clone(),
                    title,
                })
            })
            .collect()
    }

    /// Users known to the fitted model, in ascending id order.
    pub fn users(&self) -> &[String] {
        match self.state.trained() {
            Some(model) => &model.users,
            None => &[],
        }
    }
}

//! Content-based engine: items are similar when their text is similar.

use std::collections::HashMap;

use ndarray::Array2;
use recsys_core::{FitSummary, Item, ModelState, Recommendation, RecommenderError, RecommenderResult};
use tracing::{debug, info};

use crate::catalog::dedup_keep_last;
use crate::text::TfidfVectorizer;

#[derive(Debug, Clone)]
struct ContentModel {
    item_ids: Vec<String>,
    titles: Vec<String>,
    rows: HashMap<String, usize>,
    similarity: Array2<f64>,
}

/// Pairwise TF-IDF cosine similarity over the catalog.
#[derive(Debug, Clone)]
pub struct ItemCatalogIndex {
    english_stop_words: bool,
    state: ModelState<ContentModel>,
}

impl Default for ItemCatalogIndex {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ItemCatalogIndex {
    pub fn new(english_stop_words: bool) -> Self {
        Self {
            english_stop_words,
            state: ModelState::Untrained,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_trained()
    }

    /// Rebuild the index from `items`. The previous state is kept if the
    /// input is rejected.
    pub fn fit(&mut self, items: &[Item]) -> RecommenderResult<FitSummary> {
        if let Some(pos) = items.iter().position(|i| i.item_id.trim().is_empty()) {
            return Err(RecommenderError::DatasetFormat(format!(
                "item at position {} has an empty item_id",
                pos
            )));
        }

        let kept = dedup_keep_last(items);
        let docs: Vec<String> = kept.iter().map(|i| i.text_blob()).collect();

        let mut vectorizer = if self.english_stop_words {
            TfidfVectorizer::with_english_stop_words()
        } else {
            TfidfVectorizer::new()
        };
        let tfidf = vectorizer.fit_transform(&docs);
        let similarity = cosine_similarity(&tfidf);

        let item_ids: Vec<String> = kept.iter().map(|i| i.item_id.clone()).collect();
        let titles = kept.iter().map(|i| i.title.clone()).collect();
        let rows = item_ids
            .iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), row))
            .collect();

        let summary = FitSummary::new("content", item_ids.len(), tfidf.ncols());
        self.state = ModelState::Trained(ContentModel {
            item_ids,
            titles,
            rows,
            similarity,
        });

        info!(
            model_id = %summary.model_id,
            items = summary.rows,
            vocabulary = summary.columns,
            dropped_duplicates = items.len() - summary.rows,
            "Content index fitted"
        );
        Ok(summary)
    }

    /// Up to `n` items most similar to `item_id`, best first. Unknown ids and
    /// an untrained index yield an empty list.
    pub fn get_recommendations(&self, item_id: &str, n: usize) -> Vec<Recommendation> {
        let Some(model) = self.state.trained() else {
            return Vec::new();
        };
        let id = recsys_core::canonical_id(item_id);
        let Some(&row) = model.rows.get(&id) else {
            debug!(item_id = %id, "Unknown item");
            return Vec::new();
        };

        let scores = model.similarity.row(row);
        let mut ranked: Vec<(usize, f64)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(col, _)| *col != row)
            .collect();
        // Stable sort keeps catalog order among equal scores.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);

        ranked
            .into_iter()
            .map(|(col, _)| Recommendation {
                item_id: model.item_ids[col].clone(),
                title: model.titles[col].clone(),
            })
            .collect()
    }

    /// Cosine similarity between two catalog items, if both are known.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let model = self.state.trained()?;
        let ra = *model.rows.get(&recsys_core::canonical_id(a))?;
        let rb = *model.rows.get(&recsys_core::canonical_id(b))?;
        Some(model.similarity[[ra, rb]])
    }

    pub fn len(&self) -> usize {
        self.state.trained().map_or(0, |m| m.item_ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine similarity of L2-normalized rows. The diagonal is 1 for rows with
/// any weight and 0 for empty rows; off-diagonal values never exceed 1.
fn cosine_similarity(normalized: &Array2<f64>) -> Array2<f64> {
    let mut sim = normalized.dot(&normalized.t());
    let n = sim.nrows();
    for i in 0..n {
        let has_terms = normalized.row(i).iter().any(|v| *v != 0.0);
        for j in 0..n {
            if i == j {
                sim[[i, j]] = if has_terms { 1.0 } else { 0.0 };
            } else if sim[[i, j]] > 1.0 {
                sim[[i, j]] = 1.0;
            }
        }
    }
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("1", "Laptop", "Fast portable computer", "Electronics"),
            Item::new("2", "Notebook", "Portable computer for work", "Electronics"),
            Item::new("3", "Scarf", "Warm wool scarf", "Clothing"),
        ]
    }

    fn fitted() -> ItemCatalogIndex {
        let mut index = ItemCatalogIndex::default();
        index.fit(&catalog()).unwrap();
        index
    }

    #[test]
    fn test_most_similar_first() {
        let index = fitted();
        let recs = index.get_recommendations("1", 2);
        let ids: Vec<&str> = recs.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(recs[0].title, "Notebook");
    }

    #[test]
    fn test_self_never_returned() {
        let index = fitted();
        for id in ["1", "2", "3"] {
            let recs = index.get_recommendations(id, 10);
            assert_eq!(recs.len(), 2);
            assert!(recs.iter().all(|r| r.item_id != id));
        }
    }

    #[test]
    fn test_exactly_n_results() {
        let index = fitted();
        assert_eq!(index.get_recommendations("3", 1).len(), 1);
        assert!(index.get_recommendations("3", 0).is_empty());
    }

    #[test]
    fn test_unknown_or_untrained_empty() {
        let index = fitted();
        assert!(index.get_recommendations("99", 5).is_empty());
        assert!(ItemCatalogIndex::default()
            .get_recommendations("1", 5)
            .is_empty());
    }

    #[test]
    fn test_numeric_query_canonicalized() {
        let index = fitted();
        assert_eq!(index.get_recommendations(" 01 ", 1)[0].item_id, "2");
    }

    #[test]
    fn test_similarity_properties() {
        let index = fitted();
        assert_eq!(index.similarity("1", "1"), Some(1.0));
        let ab = index.similarity("1", "2").unwrap();
        let ba = index.similarity("2", "1").unwrap();
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0 && ab <= 1.0);
        assert_eq!(index.similarity("1", "3"), Some(0.0));
        assert_eq!(index.similarity("1", "x"), None);
    }

    #[test]
    fn test_diagonal_is_row_maximum() {
        let mut items = catalog();
        items.push(Item::new("4", "Laptop Bag", "laptop bag", "Accessories"));
        items.push(Item::new("5", "The", "", ""));
        let mut index = ItemCatalogIndex::default();
        index.fit(&items).unwrap();

        let ids = ["1", "2", "3", "4", "5"];
        for a in ids {
            let own = index.similarity(a, a).unwrap();
            for b in ids {
                assert!(index.similarity(a, b).unwrap() <= own, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_shared_words_rank_above_unrelated() {
        let mut index = ItemCatalogIndex::default();
        index
            .fit(&[
                Item::new("A", "laptop computer", "", ""),
                Item::new("B", "laptop notebook computer", "", ""),
                Item::new("C", "wool scarf", "", ""),
            ])
            .unwrap();
        let ids: Vec<String> = index
            .get_recommendations("A", 2)
            .into_iter()
            .map(|r| r.item_id)
            .collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn test_raw_item_ids_canonicalized() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[
                {"item_id": "007", "title": "Laptop", "description": "portable computer"},
                {"item_id": "008", "title": "Notebook", "description": "portable computer"},
                {"item_id": "009", "title": "Scarf", "description": "wool"}
            ]"#,
        )
        .unwrap();
        let mut index = ItemCatalogIndex::default();
        index.fit(&items).unwrap();

        for query in ["7", "007"] {
            let recs = index.get_recommendations(query, 2);
            assert_eq!(recs.len(), 2);
            assert_eq!(recs[0].item_id, "8");
            assert_eq!(recs[0].title, "Notebook");
        }
        assert!(index.similarity("007", "8").is_some());
    }

    #[test]
    fn test_empty_dataset() {
        let mut index = ItemCatalogIndex::default();
        let summary = index.fit(&[]).unwrap();
        assert_eq!(summary.rows, 0);
        assert!(index.is_trained());
        assert!(index.is_empty());
        assert!(index.get_recommendations("1", 3).is_empty());
    }

    #[test]
    fn test_only_stop_words() {
        let mut index = ItemCatalogIndex::default();
        index
            .fit(&[Item::new("1", "The", "", ""), Item::new("2", "It", "", "")])
            .unwrap();
        assert_eq!(index.similarity("1", "1"), Some(0.0));
        // Ties fall back to catalog order.
        assert_eq!(index.get_recommendations("1", 5)[0].item_id, "2");
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let mut items = catalog();
        items.push(Item::new("1", "Wool Hat", "Warm wool", "Clothing"));
        let mut index = ItemCatalogIndex::default();
        let summary = index.fit(&items).unwrap();
        assert_eq!(summary.rows, 3);

        let recs = index.get_recommendations("3", 1);
        assert_eq!(recs[0].item_id, "1");
        assert_eq!(recs[0].title, "Wool Hat");
    }

    #[test]
    fn test_refit_is_idempotent() {
        let mut index = fitted();
        let before = index.get_recommendations("2", 5);
        index.fit(&catalog()).unwrap();
        assert_eq!(index.get_recommendations("2", 5), before);
    }

    #[test]
    fn test_empty_id_rejected_keeps_state() {
        let mut index = fitted();
        let mut items = catalog();
        items.push(Item {
            item_id: "  ".to_string(),
            title: "Ghost".to_string(),
            description: String::new(),
            category: String::new(),
        });
        assert!(matches!(
            index.fit(&items),
            Err(RecommenderError::DatasetFormat(_))
        ));
        assert_eq!(index.len(), 3);
    }
}

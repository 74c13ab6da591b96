use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry as read from the item dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

impl Item {
    pub fn new(
        item_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            item_id: canonical_id(&item_id.into()),
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Text used for content similarity: title, description and category
    /// joined by single spaces.
    pub fn text_blob(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.category)
    }
}

/// One user's rating of one item. A value of 0 means "unrated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub item_id: String,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>, rating: f64) -> Self {
        Self {
            user_id: canonical_id(&user_id.into()),
            item_id: canonical_id(&item_id.into()),
            rating,
        }
    }
}

/// A single ranked result returned by either engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: String,
    pub title: String,
}

/// Title used when the collaborative engine has no catalog to resolve against.
pub const UNKNOWN_TITLE: &str = "N/A";

/// Metadata describing one completed fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub model_id: Uuid,
    pub engine: String,
    pub rows: usize,
    pub columns: usize,
    pub fitted_at: DateTime<Utc>,
}

impl FitSummary {
    pub fn new(engine: &str, rows: usize, columns: usize) -> Self {
        Self {
            model_id: Uuid::new_v4(),
            engine: engine.to_string(),
            rows,
            columns,
            fitted_at: Utc::now(),
        }
    }
}

/// Trained-or-not state of a model. Callers must match on it before
/// querying instead of consulting a separate flag.
#[derive(Debug, Clone)]
pub enum ModelState<T> {
    Untrained,
    Trained(T),
}

impl<T> Default for ModelState<T> {
    fn default() -> Self {
        ModelState::Untrained
    }
}

impl<T> ModelState<T> {
    pub fn is_trained(&self) -> bool {
        matches!(self, ModelState::Trained(_))
    }

    pub fn trained(&self) -> Option<&T> {
        match self {
            ModelState::Trained(state) => Some(state),
            ModelState::Untrained => None,
        }
    }
}

/// Normalize an identifier so numeric and textual spellings of the same id
/// compare equal: surrounding whitespace is trimmed and integers are
/// rewritten in plain decimal form (`"007"` becomes `"7"`).
pub fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `RECSYS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub collaborative: CollaborativeConfig,
}

/// Where the CLI looks for its datasets when no path is passed explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_items_path")]
    pub items_path: String,
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,
    #[serde(default = "default_num_recommendations")]
    pub num_recommendations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Drop English stop-words from the vocabulary.
    #[serde(default = "default_english_stop_words")]
    pub english_stop_words: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollaborativeConfig {
    /// Neighbors fetched per query, counting the querying user itself.
    #[serde(default = "default_k_neighbors")]
    pub k_neighbors: usize,
}

// Default functions
fn default_items_path() -> String {
    "data/products.csv".to_string()
}
fn default_ratings_path() -> String {
    "data/ratings.csv".to_string()
}
fn default_num_recommendations() -> usize {
    10
}
fn default_english_stop_words() -> bool {
    true
}
fn default_k_neighbors() -> usize {
    11
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
            ratings_path: default_ratings_path(),
            num_recommendations: default_num_recommendations(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            english_stop_words: default_english_stop_words(),
        }
    }
}

impl Default for CollaborativeConfig {
    fn default() -> Self {
        Self {
            k_neighbors: default_k_neighbors(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            content: ContentConfig::default(),
            collaborative: CollaborativeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("RECSYS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

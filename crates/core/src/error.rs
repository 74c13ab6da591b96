use thiserror::Error;

pub type RecommenderResult<T> = Result<T, RecommenderError>;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Dataset format error: {0}")]
    DatasetFormat(String),

    #[error("Models not trained; load the item and ratings datasets first")]
    NotTrained,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RecommenderError {
    /// Shorthand for a dataset error tied to a specific input line.
    pub fn at_line(line: u64, message: impl std::fmt::Display) -> Self {
        RecommenderError::DatasetFormat(format!("line {line}: {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_message() {
        let err = RecommenderError::at_line(4, "rating 'five' is not a number");
        assert_eq!(
            err.to_string(),
            "Dataset format error: line 4: rating 'five' is not a number"
        );
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let err: RecommenderError = anyhow::anyhow!("matrix shape mismatch").into();
        assert!(matches!(err, RecommenderError::Internal(_)));
        assert!(err.to_string().contains("matrix shape mismatch"));
    }
}

use thiserror::Error;

/// Result type for osteocat operations
pub type Result<T> = std::result::Result<T, OsteocatError>;

/// Error types for osteocat operations
#[derive(Error, Debug)]
pub enum OsteocatError {
    /// A required biochemical indicator is absent from the request
    #[error("Missing required biochemical indicator: {0}")]
    MissingIndicator(String),

    /// Request field present but unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Summarization response could not be parsed as JSON
    #[error("AI 返回结果无法解析为 JSON：\n{raw}")]
    SummaryParse { raw: String },

    /// Summarization collaborator failed before producing a response
    #[error("Summarizer error: {0}")]
    Summarizer(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OsteocatError {
    /// Returns whether this is the request validation failure that
    /// names a missing indicator
    pub fn is_missing_indicator(&self) -> bool {
        matches!(self, OsteocatError::MissingIndicator(_))
    }
}

// Helper conversions
impl From<String> for OsteocatError {
    fn from(s: String) -> Self {
        OsteocatError::InvalidInput(s)
    }
}

impl From<&str> for OsteocatError {
    fn from(s: &str) -> Self {
        OsteocatError::InvalidInput(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_indicator_message() {
        let err = OsteocatError::MissingIndicator("Parathyroid Hormone".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required biochemical indicator: Parathyroid Hormone"
        );
        assert!(err.is_missing_indicator());
    }

    #[test]
    fn test_summary_parse_keeps_raw_text() {
        let err = OsteocatError::SummaryParse {
            raw: "not json".to_string(),
        };
        assert!(err.to_string().ends_with("not json"));
        assert!(!err.is_missing_indicator());
    }

    #[test]
    fn test_from_str_is_invalid_input() {
        let err: OsteocatError = "bad gender".into();
        assert!(matches!(err, OsteocatError::InvalidInput(ref m) if m == "bad gender"));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid rule for '{path}': {reason}")]
    InvalidRule { path: String, reason: String },

    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

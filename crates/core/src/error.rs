#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid GPU count in {field}: {value:?}")]
    InvalidCount { field: &'static str, value: String },

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid triage policy: {0}")]
    InvalidPolicy(String),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;

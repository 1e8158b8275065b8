use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("failed to reach diagnosis engine: {0}")]
    Connection(reqwest::Error),
    #[error("diagnosis engine request timed out after {0} seconds")]
    Timeout(u64),
    #[error("diagnosis engine request failed: {0}")]
    Transport(reqwest::Error),
    #[error("diagnosis engine returned status {status}")]
    Upstream { status: u16, detail: Value },
    #[error("failed to decode diagnosis engine response: {0}")]
    Decode(reqwest::Error),
}

impl EngineError {
    /// Detail suitable for a structured error body: the upstream payload
    /// when the engine reported one, otherwise this error's message.
    pub fn detail(&self) -> Value {
        match self {
            EngineError::Upstream { detail, .. } => detail.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

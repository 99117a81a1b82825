// Repository trait for the ridership dataset
use crate::domain::ridership::Dataset;
use async_trait::async_trait;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Failure to produce the dataset; the dashboard does not start without one
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset source {source_name} is unreachable")]
    Unreachable {
        source_name: String,
        #[source]
        cause: Cause,
    },

    #[error("dataset source {source_name} is malformed at line {line}")]
    Malformed {
        source_name: String,
        line: u64,
        #[source]
        cause: Cause,
    },
}

#[async_trait]
pub trait RidershipRepository: Send + Sync {
    /// Load every record once
    async fn load(&self) -> Result<Dataset, LoadError>;
}

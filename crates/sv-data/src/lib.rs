//! Game dataset loading, filtering and aggregation

pub mod aggregate;
pub mod config;
pub mod filter;
pub mod precomputed;
pub mod records;
pub mod sources;
pub mod store;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use aggregate::{aggregate_publishers, visible_publishers, PublisherAggregate};
pub use config::CoercionConfig;
pub use filter::{scope_games, top_games, GameFilter, PublisherScope};
pub use precomputed::{PrecomputedAggregates, SeriesPoint};
pub use records::{GameClass, GameRecord, GameRef};
pub use sources::{CsvSource, GameSource};
pub use store::{Dataset, DatasetStore};

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("no valid rows in {0}")]
    EmptyDataset(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

pub mod csv_source;

use async_trait::async_trait;

use crate::store::Dataset;
use crate::DataError;

pub use csv_source::CsvSource;

/// Something the dashboard can load its dataset from
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Load and coerce every record plus the release-count series
    async fn load(&self) -> Result<Dataset, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use csv::ReaderBuilder;

use crate::config::CoercionConfig;
use crate::precomputed::{PrecomputedAggregates, RawBucketRow};
use crate::records::{GameRecord, RawGameRow};
use crate::sources::GameSource;
use crate::store::Dataset;
use crate::DataError;

/// Loads the game table and the optional preprocessing table from disk
pub struct CsvSource {
    /// Path to the game CSV
    games_path: PathBuf,
    /// Path to the release-count CSV; computed from the games when absent
    aggregates_path: Option<PathBuf>,
    coercion: CoercionConfig,
    name: String,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(games_path: PathBuf) -> Result<Self, DataError> {
        if games_path.as_os_str().is_empty() {
            return Err(DataError::Config("game CSV path is empty".to_string()));
        }
        let name = games_path.display().to_string();
        Ok(Self {
            games_path,
            aggregates_path: None,
            coercion: CoercionConfig::default(),
            name,
        })
    }

    pub fn with_aggregates(mut self, path: Option<PathBuf>) -> Self {
        self.aggregates_path = path;
        self
    }

    pub fn with_coercion(mut self, coercion: CoercionConfig) -> Self {
        self.coercion = coercion;
        self
    }

    /// Parse game rows, dropping rows without a valid release date.
    pub fn parse_games<R: Read>(reader: R, coercion: &CoercionConfig) -> Result<Vec<GameRecord>, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in csv_reader.deserialize::<RawGameRow>() {
            match row?.into_record(coercion) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::info!(dropped, kept = records.len(), "dropped games without a valid release date");
        }
        Ok(records)
    }

    /// Parse the `type,timestamp,date,count` preprocessing table.
    pub fn parse_aggregates<R: Read>(reader: R, coercion: &CoercionConfig) -> Result<PrecomputedAggregates, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let rows = csv_reader
            .deserialize::<RawBucketRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PrecomputedAggregates::from_rows(rows, coercion))
    }

    fn load_blocking(
        games_path: &Path,
        aggregates_path: Option<&Path>,
        coercion: &CoercionConfig,
    ) -> Result<Dataset, DataError> {
        let file = File::open(games_path)?;
        let records = Self::parse_games(BufReader::new(file), coercion)?;
        if records.is_empty() {
            return Err(DataError::EmptyDataset(games_path.display().to_string()));
        }

        let aggregates = match aggregates_path {
            Some(path) => match File::open(path) {
                Ok(file) => Self::parse_aggregates(BufReader::new(file), coercion)?,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "preprocessing file missing, counting releases from the game table");
                    PrecomputedAggregates::from_records(&records)
                }
                Err(err) => return Err(err.into()),
            },
            None => PrecomputedAggregates::from_records(&records),
        };

        if aggregates.is_empty() {
            tracing::warn!("release-count series are empty");
        }

        let games = records.into_iter().map(Arc::new).collect();
        Ok(Dataset::new(games, aggregates))
    }
}

#[async_trait]
impl GameSource for CsvSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        let games_path = self.games_path.clone();
        let aggregates_path = self.aggregates_path.clone();
        let coercion = self.coercion.clone();

        tracing::info!(source = %self.name, "loading games");
        tokio::task::spawn_blocking(move || {
            Self::load_blocking(&games_path, aggregates_path.as_deref(), &coercion)
        })
        .await?
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sv_core::{AppId, Granularity};

    const GAMES: &str = "\
AppID,Name,Release date,Peak CCU,Price,Positive,Negative,Review Ratio,Publishers,class,Header image,revenue,Extra
10,Counter-Strike,\"Nov 1, 2000\",13000,9.99,120000,3000,0.975,Valve,AAA,https://img/10.jpg,5000000,x
20,Broken,not a date,5,1,1,1,0.5,Someone,Indie,,,
30,Little Game,2019-04-02,oops,0,10,0,1.0,,indie,,,
";

    #[test]
    fn test_parse_games_drops_invalid_dates() {
        let records = CsvSource::parse_games(GAMES.as_bytes(), &CoercionConfig::default()).unwrap();
        assert_eq!(records.len(), 2);

        let cs = &records[0];
        assert_eq!(cs.app_id, AppId(10));
        assert_eq!(cs.release_date, NaiveDate::from_ymd_opt(2000, 11, 1).unwrap());
        assert_eq!(cs.revenue, Some(5_000_000.0));
        assert_eq!(cs.header_image.as_deref(), Some("https://img/10.jpg"));

        let little = &records[1];
        assert_eq!(little.peak_ccu, 0.0);
        assert!(little.is_indie());
        assert_eq!(little.publisher_field, "Unknown");
    }

    #[test]
    fn test_parse_games_without_revenue_column() {
        let csv = "AppID,Name,Release date,Peak CCU\n1,Solo,2012-01-01,42\n";
        let records = CsvSource::parse_games(csv.as_bytes(), &CoercionConfig::default()).unwrap();
        assert_eq!(records[0].revenue, None);
        assert_eq!(records[0].peak_ccu, 42.0);
    }

    #[test]
    fn test_parse_aggregates() {
        let csv = "type,timestamp,date,count\nmonthly,,2012-01-01,7\nyearly,,2012-01-01,90\ndaily,1325376000000,,3\n";
        let aggregates = CsvSource::parse_aggregates(csv.as_bytes(), &CoercionConfig::default()).unwrap();
        assert_eq!(aggregates.series(Granularity::Monthly)[0].count, 7.0);
        assert_eq!(aggregates.series(Granularity::Yearly)[0].count, 90.0);
        assert_eq!(
            aggregates.series(Granularity::Daily)[0].date,
            NaiveDate::from_ymd_opt(2012, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_path_is_a_config_error() {
        assert!(matches!(CsvSource::new(PathBuf::new()), Err(DataError::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = CsvSource::new(PathBuf::from("/definitely/not/here/games.csv")).unwrap();
        assert!(matches!(source.load().await, Err(DataError::Io(_))));
    }
}

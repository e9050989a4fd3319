//! Game records and their CSV row layout

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use sv_core::AppId;

use crate::config::CoercionConfig;

/// Shared handle to an immutable record.
pub type GameRef = Arc<GameRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameClass {
    Indie,
    Other(String),
}

impl GameClass {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(class) if class.eq_ignore_ascii_case("indie") => Self::Indie,
            Some(class) => Self::Other(class.to_string()),
            None => Self::Other(String::new()),
        }
    }
}

/// One row of the game dataset with every derived field already coerced
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub app_id: AppId,
    pub name: String,
    /// Raw comma-joined publisher field; use [`GameRecord::publishers`]
    pub publisher_field: String,
    pub release_date: NaiveDate,
    pub price: f64,
    pub peak_ccu: f64,
    pub positive: f64,
    pub negative: f64,
    pub review_ratio: f64,
    pub class: GameClass,
    pub header_image: Option<String>,
    pub revenue: Option<f64>,
}

impl GameRecord {
    pub fn is_indie(&self) -> bool {
        self.class == GameClass::Indie
    }

    /// Trimmed, non-empty publisher names.
    pub fn publishers(&self) -> impl Iterator<Item = &str> {
        self.publisher_field
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn has_publisher(&self, name: &str) -> bool {
        self.publishers().any(|publisher| publisher == name)
    }

    pub fn store_url(&self) -> String {
        format!("https://store.steampowered.com/app/{}", self.app_id)
    }
}

/// Game CSV row as it appears on disk. Every column is optional text so a
/// malformed cell never rejects the whole file.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawGameRow {
    #[serde(rename = "AppID", default)]
    pub app_id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Publishers", default)]
    pub publishers: Option<String>,
    #[serde(rename = "Release date", default)]
    pub release_date: Option<String>,
    #[serde(rename = "Price", default)]
    pub price: Option<String>,
    #[serde(rename = "Peak CCU", default)]
    pub peak_ccu: Option<String>,
    #[serde(rename = "Positive", default)]
    pub positive: Option<String>,
    #[serde(rename = "Negative", default)]
    pub negative: Option<String>,
    #[serde(rename = "Review Ratio", default)]
    pub review_ratio: Option<String>,
    #[serde(rename = "class", default)]
    pub class: Option<String>,
    #[serde(rename = "Header image", default)]
    pub header_image: Option<String>,
    #[serde(rename = "revenue", default)]
    pub revenue: Option<String>,
}

impl RawGameRow {
    /// Coerce the row. Rows without a valid release date yield `None`.
    pub fn into_record(self, config: &CoercionConfig) -> Option<GameRecord> {
        let release_date = config.date(self.release_date.as_deref())?;

        let app_id = config
            .number(self.app_id.as_deref())
            .filter(|id| *id >= 0.0)
            .map(|id| AppId(id as u64))
            .unwrap_or(AppId(0));

        let publisher_field = config
            .text(self.publishers.as_deref())
            .unwrap_or_else(|| config.unknown_publisher.clone());

        Some(GameRecord {
            app_id,
            name: config.text(self.name.as_deref()).unwrap_or_default(),
            publisher_field,
            release_date,
            price: config.number_or_zero(self.price.as_deref()),
            peak_ccu: config.number_or_zero(self.peak_ccu.as_deref()),
            positive: config.number_or_zero(self.positive.as_deref()),
            negative: config.number_or_zero(self.negative.as_deref()),
            review_ratio: config.number_or_zero(self.review_ratio.as_deref()),
            class: GameClass::parse(config.text(self.class.as_deref()).as_deref()),
            header_image: config.text(self.header_image.as_deref()),
            revenue: config.number(self.revenue.as_deref()),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal record for unit tests.
    pub fn game(id: u64, publishers: &str, peak: f64, ratio: f64, indie: bool) -> GameRef {
        Arc::new(GameRecord {
            app_id: AppId(id),
            name: format!("Game {id}"),
            publisher_field: publishers.to_string(),
            release_date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            price: 9.99,
            peak_ccu: peak,
            positive: 90.0,
            negative: 10.0,
            review_ratio: ratio,
            class: if indie { GameClass::Indie } else { GameClass::Other("AAA".into()) },
            header_image: None,
            revenue: Some(1000.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, publishers: &str) -> RawGameRow {
        RawGameRow {
            app_id: Some("570".into()),
            name: Some("Dota 2".into()),
            publishers: Some(publishers.into()),
            release_date: Some(date.into()),
            price: Some("free".into()),
            peak_ccu: Some("1291328".into()),
            class: Some("AAA".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_coercion() {
        let record = row("Jul 9, 2013", "Valve").into_record(&CoercionConfig::default()).unwrap();
        assert_eq!(record.app_id, AppId(570));
        assert_eq!(record.price, 0.0);
        assert_eq!(record.peak_ccu, 1_291_328.0);
        assert_eq!(record.revenue, None);
        assert!(!record.is_indie());
        assert_eq!(record.store_url(), "https://store.steampowered.com/app/570");
    }

    #[test]
    fn test_invalid_date_drops_row() {
        assert!(row("TBA", "Valve").into_record(&CoercionConfig::default()).is_none());
    }

    #[test]
    fn test_empty_publisher_becomes_unknown() {
        let record = row("2013-07-09", " ").into_record(&CoercionConfig::default()).unwrap();
        assert_eq!(record.publishers().collect::<Vec<_>>(), vec!["Unknown"]);
    }

    #[test]
    fn test_publisher_split_and_membership() {
        let record = row("2013-07-09", "Valve, Hidden Path ,").into_record(&CoercionConfig::default()).unwrap();
        assert_eq!(record.publishers().collect::<Vec<_>>(), vec!["Valve", "Hidden Path"]);
        assert!(record.has_publisher("Hidden Path"));
        assert!(!record.has_publisher("Hidden"));
    }

    #[test]
    fn test_indie_class_is_case_insensitive() {
        assert_eq!(GameClass::parse(Some(" INDIE ")), GameClass::Indie);
        assert_eq!(GameClass::parse(None), GameClass::Other(String::new()));
    }
}

//! Dashboard settings, read from an optional JSON file

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sv_core::{BrushConfig, CarouselLayout};
use sv_data::{CoercionConfig, CsvSource};
use sv_views::{CardListConfig, GameBubbleConfig, PublisherBubbleConfig, ScatterConfig, ViewportConfig};

/// Environment variable consulted when no config path is given on the command line
pub const CONFIG_ENV: &str = "SV_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Game table
    pub games: PathBuf,
    /// Release-count table; counted from the games when missing
    pub aggregates: Option<PathBuf>,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            games: PathBuf::from("data/games-data.csv"),
            aggregates: Some(PathBuf::from("data/preprocessing.csv")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            initial: 5_000.0,
            min: 5_000.0,
            max: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub limit: usize,
    pub cards_per_page: usize,
    pub card_width: f32,
    pub card_margin: f32,
    pub inset: f32,
    pub rotate_every_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let layout = CarouselLayout::default();
        Self {
            limit: 24,
            cards_per_page: layout.cards_per_page,
            card_width: layout.card_width,
            card_margin: layout.card_margin,
            inset: layout.inset,
            rotate_every_ms: 5_000,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataPaths,
    pub coercion: CoercionConfig,
    pub threshold: ThresholdConfig,
    pub brush: BrushConfig,
    pub carousel: CarouselConfig,
    /// Number of bubbles in the per-publisher game view
    pub game_limit: usize,
    /// Right edge of the scatter plot's price axis
    pub price_cap: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            coercion: CoercionConfig::default(),
            threshold: ThresholdConfig::default(),
            brush: BrushConfig::default(),
            carousel: CarouselConfig::default(),
            game_limit: GameBubbleConfig::default().limit,
            price_cap: ScatterConfig::default().price_cap,
        }
    }
}

impl DashboardConfig {
    /// Config path from the first CLI argument, then [`CONFIG_ENV`].
    pub fn path_from_env() -> Option<PathBuf> {
        std::env::args_os()
            .nth(1)
            .or_else(|| std::env::var_os(CONFIG_ENV))
            .map(PathBuf::from)
    }

    /// Read `path`, or fall back to defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::info!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    /// Repair values the views cannot work with.
    fn normalize(&mut self) {
        if self.threshold.min > self.threshold.max {
            tracing::warn!(min = self.threshold.min, max = self.threshold.max, "threshold bounds swapped");
            std::mem::swap(&mut self.threshold.min, &mut self.threshold.max);
        }
        self.threshold.initial = self.threshold.initial.clamp(self.threshold.min, self.threshold.max);
        if self.brush.walkthrough_step_days < 1 {
            tracing::warn!(step_days = self.brush.walkthrough_step_days, "walkthrough step raised to 1 day");
            self.brush.walkthrough_step_days = 1;
        }
        if self.brush.walkthrough_window_months == 0 {
            tracing::warn!("walkthrough window raised to 1 month");
            self.brush.walkthrough_window_months = 1;
        }
        self.carousel.cards_per_page = self.carousel.cards_per_page.max(1);
        if self.game_limit == 0 {
            self.game_limit = GameBubbleConfig::default().limit;
        }
        if !(self.price_cap.is_finite() && self.price_cap > 0.0) {
            self.price_cap = ScatterConfig::default().price_cap;
        }
    }

    pub fn source(&self) -> Result<CsvSource> {
        let source = CsvSource::new(self.data.games.clone())?
            .with_aggregates(self.data.aggregates.clone())
            .with_coercion(self.coercion.clone());
        Ok(source)
    }

    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            brush: self.brush.clone(),
            publishers: PublisherBubbleConfig {
                threshold_min: self.threshold.min,
                threshold_max: self.threshold.max,
                ..PublisherBubbleConfig::default()
            },
            games: GameBubbleConfig {
                limit: self.game_limit,
                ..GameBubbleConfig::default()
            },
            scatter: ScatterConfig {
                price_cap: self.price_cap,
                ..ScatterConfig::default()
            },
            cards: CardListConfig {
                limit: self.carousel.limit,
                layout: CarouselLayout {
                    cards_per_page: self.carousel.cards_per_page,
                    card_width: self.carousel.card_width,
                    card_margin: self.carousel.card_margin,
                    inset: self.carousel.inset,
                },
                rotate_every: Duration::from_millis(self.carousel.rotate_every_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::{BrushInput, BrushMachine, DateExtent};

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config.threshold.initial, 5_000.0);
        assert_eq!(config.data.games, PathBuf::from("data/games-data.csv"));
        assert_eq!(config.game_limit, 50);
        assert_eq!(config.price_cap, 100.0);
        assert_eq!(config.brush.walkthrough_start_year, 2006);
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{
            "data": { "games": "/tmp/games.csv", "aggregates": null },
            "threshold": { "initial": 20000 },
            "carousel": { "rotate_every_ms": 2000 }
        }"#;
        let config = DashboardConfig::from_json(json).unwrap();
        assert_eq!(config.data.aggregates, None);
        assert_eq!(config.threshold.initial, 20_000.0);
        assert_eq!(config.threshold.max, 100_000.0);

        let viewport = config.viewport_config();
        assert_eq!(viewport.cards.rotate_every, Duration::from_millis(2000));
        assert_eq!(viewport.cards.layout.cards_per_page, 4);
    }

    #[test]
    fn test_normalize_repairs_bounds() {
        let json = r#"{ "threshold": { "initial": 1, "min": 500, "max": 10 }, "price_cap": -3 }"#;
        let config = DashboardConfig::from_json(json).unwrap();
        assert_eq!((config.threshold.min, config.threshold.max), (10.0, 500.0));
        assert_eq!(config.threshold.initial, 10.0);
        assert_eq!(config.price_cap, 100.0);
    }

    #[test]
    fn test_normalize_repairs_walkthrough() {
        let json = r#"{ "brush": { "walkthrough_step_days": 0, "walkthrough_window_months": 0 } }"#;
        let config = DashboardConfig::from_json(json).unwrap();
        assert_eq!(config.brush.walkthrough_step_days, 1);
        assert_eq!(config.brush.walkthrough_window_months, 1);

        let day = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let mut brush = BrushMachine::new(config.brush.clone());
        brush.handle(BrushInput::DataLoaded(DateExtent::new(day(2000, 1, 1), day(2010, 1, 1))));
        brush.handle(BrushInput::ToggleWalkthrough);
        let emitted = brush.handle(BrushInput::Elapsed(Duration::from_secs(3600)));
        assert!(!brush.is_walkthrough_active());
        assert!(emitted.len() < 4000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/no/such/config.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}

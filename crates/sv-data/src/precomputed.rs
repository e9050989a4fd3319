//! Release counts bucketed per day, month and year

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use sv_core::{DateExtent, Granularity, TimeFilter};

use crate::config::{date_from_millis, parse_date, CoercionConfig};
use crate::records::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub count: f64,
}

/// Ascending release-count series at the three granularities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedAggregates {
    daily: Vec<SeriesPoint>,
    monthly: Vec<SeriesPoint>,
    yearly: Vec<SeriesPoint>,
}

/// Preprocessing CSV row: `type,timestamp,date,count`
#[derive(Debug, Deserialize)]
pub(crate) struct RawBucketRow {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
}

impl PrecomputedAggregates {
    /// Build from the preprocessing file rows. Unknown bucket types and rows
    /// without a usable date are skipped.
    pub(crate) fn from_rows(rows: impl IntoIterator<Item = RawBucketRow>, config: &CoercionConfig) -> Self {
        let mut aggregates = Self::default();
        let mut skipped = 0usize;

        for row in rows {
            let granularity = match row.kind.as_deref().map(str::trim) {
                Some("daily") => Granularity::Daily,
                Some("monthly") => Granularity::Monthly,
                Some("yearly") => Granularity::Yearly,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let date = config
                .number(row.timestamp.as_deref())
                .and_then(date_from_millis)
                .or_else(|| row.date.as_deref().and_then(parse_date));
            let Some(date) = date else {
                skipped += 1;
                continue;
            };

            let count = config.number_or_zero(row.count.as_deref()).max(0.0);
            aggregates
                .series_mut(granularity)
                .push(SeriesPoint { date: granularity.bucket_start(date), count });
        }

        if skipped > 0 {
            tracing::info!(skipped, "skipped unusable preprocessing rows");
        }
        aggregates.sort();
        aggregates
    }

    /// Count releases per bucket directly from the records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut monthly: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut yearly: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for record in records {
            let date = record.release_date;
            *daily.entry(Granularity::Daily.bucket_start(date)).or_default() += 1.0;
            *monthly.entry(Granularity::Monthly.bucket_start(date)).or_default() += 1.0;
            *yearly.entry(Granularity::Yearly.bucket_start(date)).or_default() += 1.0;
        }

        let collect = |map: BTreeMap<NaiveDate, f64>| {
            map.into_iter()
                .map(|(date, count)| SeriesPoint { date, count })
                .collect()
        };
        Self {
            daily: collect(daily),
            monthly: collect(monthly),
            yearly: collect(yearly),
        }
    }

    pub fn series(&self, granularity: Granularity) -> &[SeriesPoint] {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Monthly => &self.monthly,
            Granularity::Yearly => &self.yearly,
        }
    }

    fn series_mut(&mut self, granularity: Granularity) -> &mut Vec<SeriesPoint> {
        match granularity {
            Granularity::Daily => &mut self.daily,
            Granularity::Monthly => &mut self.monthly,
            Granularity::Yearly => &mut self.yearly,
        }
    }

    fn sort(&mut self) {
        for series in [&mut self.daily, &mut self.monthly, &mut self.yearly] {
            series.sort_by_key(|point| point.date);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.monthly.is_empty() && self.yearly.is_empty()
    }

    /// Points of one series that fall inside `filter` (inclusive).
    pub fn filtered(&self, granularity: Granularity, filter: &TimeFilter) -> Vec<SeriesPoint> {
        self.series(granularity)
            .iter()
            .filter(|point| filter.contains(point.date))
            .copied()
            .collect()
    }

    /// Date extent of the daily series, falling back to the coarser ones.
    pub fn extent(&self) -> Option<DateExtent> {
        [Granularity::Daily, Granularity::Monthly, Granularity::Yearly]
            .into_iter()
            .find_map(|granularity| {
                let series = self.series(granularity);
                Some(DateExtent::new(series.first()?.date, series.last()?.date))
            })
    }
}

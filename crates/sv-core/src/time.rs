//! Date ranges, filters and bucket granularity for the release timeline

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeRange {
    /// Create a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days between the bounds (0 for a single-day range).
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Active release-date filter. `All` is the "no filter" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFilter {
    #[default]
    All,
    Range(TimeRange),
}

impl TimeFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Range(range) => range.contains(date),
        }
    }
}

impl From<TimeRange> for TimeFilter {
    fn from(range: TimeRange) -> Self {
        Self::Range(range)
    }
}

/// Earliest and latest day present in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateExtent {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateExtent {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Extent covering every date in the iterator, or `None` if it is empty.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(Self { min: date, max: date }),
            Some(extent) => Some(Self {
                min: extent.min.min(date),
                max: extent.max.max(date),
            }),
        })
    }

    pub fn as_range(&self) -> TimeRange {
        TimeRange::new(self.min, self.max)
    }
}

/// Bucket size of the timeline series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Bucket size for the given span in days.
    pub fn for_span_days(days: i64) -> Self {
        if days > 730 {
            Self::Yearly
        } else if days > 60 {
            Self::Monthly
        } else {
            Self::Daily
        }
    }

    /// Bucket size used to draw data under `filter`. The full view is monthly.
    pub fn for_filter(filter: &TimeFilter) -> Self {
        match filter {
            TimeFilter::All => Self::Monthly,
            TimeFilter::Range(range) => Self::for_span_days(range.span_days()),
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Monthly => date.with_day(1).unwrap_or(date),
            Self::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Plot coordinate of a date (days since 0001-01-01).
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], rounding to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    let days = x.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    NaiveDate::from_num_days_from_ce_opt(days)
}

/// `date` shifted by a whole number of months, saturating at the calendar edges.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(if months >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_range_swaps_reversed_bounds() {
        let range = TimeRange::new(d(2020, 5, 1), d(2019, 1, 1));
        assert_eq!(range.start(), d(2019, 1, 1));
        assert_eq!(range.end(), d(2020, 5, 1));
    }

    #[test]
    fn test_single_day_range_is_inclusive() {
        let day = d(2015, 3, 14);
        let filter = TimeFilter::Range(TimeRange::single_day(day));
        assert!(filter.contains(day));
        assert!(!filter.contains(d(2015, 3, 13)));
        assert!(!filter.contains(d(2015, 3, 15)));
    }

    #[test]
    fn test_granularity_thresholds() {
        assert_eq!(Granularity::for_span_days(731), Granularity::Yearly);
        assert_eq!(Granularity::for_span_days(730), Granularity::Monthly);
        assert_eq!(Granularity::for_span_days(61), Granularity::Monthly);
        assert_eq!(Granularity::for_span_days(60), Granularity::Daily);
        assert_eq!(Granularity::for_filter(&TimeFilter::All), Granularity::Monthly);
    }

    #[test]
    fn test_bucket_start() {
        assert_eq!(Granularity::Monthly.bucket_start(d(2012, 7, 19)), d(2012, 7, 1));
        assert_eq!(Granularity::Yearly.bucket_start(d(2012, 7, 19)), d(2012, 1, 1));
    }

    #[test]
    fn test_plot_coordinate_round_trip() {
        let day = d(2009, 12, 31);
        assert_eq!(x_to_date(date_to_x(day) + 0.3), Some(day));
        assert_eq!(x_to_date(f64::NAN), None);
    }

    #[test]
    fn test_shift_months_handles_leap_day() {
        assert_eq!(shift_months(d(2020, 2, 29), -12), d(2019, 2, 28));
        assert_eq!(shift_months(d(2006, 1, 1), 12), d(2007, 1, 1));
    }

    #[test]
    fn test_extent_from_dates() {
        assert_eq!(DateExtent::from_dates(Vec::new()), None);
        let extent = DateExtent::from_dates([d(2010, 1, 1), d(2005, 6, 1), d(2008, 1, 1)]).unwrap();
        assert_eq!(extent.min, d(2005, 6, 1));
        assert_eq!(extent.max, d(2010, 1, 1));
    }
}

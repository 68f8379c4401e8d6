//! Pure post-processing for SQL aggregates: zero-filled distributions,
//! guarded ratios, trend ordering and salary bands.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::FromRow;

/// Trend series never carry more than this many buckets.
pub const TREND_BUCKETS: usize = 12;

/// One row of a `GROUP BY` count. `label` is null when the grouped column is.
#[derive(Debug, Clone, PartialEq, serde::Serialize, FromRow)]
pub struct BucketCount {
    pub label: Option<String>,
    pub count: i64,
}

/// One bucket of a time series, keyed by a sortable string ("2024-07", "2024-W05").
#[derive(Debug, Clone, PartialEq, serde::Serialize, FromRow)]
pub struct TrendPoint {
    pub bucket: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, FromRow)]
pub struct RatingTrendPoint {
    pub bucket: String,
    pub count: i64,
    pub average_rating: Option<f64>,
}

impl RatingTrendPoint {
    pub fn rounded(mut self) -> Self {
        self.average_rating = self.average_rating.map(round2);
        self
    }
}

/// Takes buckets fetched newest-first, keeps the latest [`TREND_BUCKETS`]
/// and returns them oldest-first for charting.
pub fn finalize_trend<T>(mut newest_first: Vec<T>) -> Vec<T> {
    newest_first.truncate(TREND_BUCKETS);
    newest_first.reverse();
    newest_first
}

/// Star counts for ratings 1..=5. Always serializes all five keys, "5" first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingDistribution {
    counts: [i64; 5],
}

impl RatingDistribution {
    /// Builds from `(rating, count)` rows; ratings outside 1..=5 are ignored.
    pub fn from_rows(rows: &[(i32, i64)]) -> Self {
        let mut distribution = Self::default();
        for &(rating, count) in rows {
            if (1..=5).contains(&rating) {
                distribution.counts[(rating - 1) as usize] += count;
            }
        }
        distribution
    }

    pub fn get(&self, stars: u8) -> i64 {
        match stars {
            1..=5 => self.counts[(stars - 1) as usize],
            _ => 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.counts.iter().sum()
    }

    /// Mean rating, or `None` with no ratings.
    pub fn average(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: i64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, count)| (i as i64 + 1) * count)
            .sum();
        Some(weighted as f64 / total as f64)
    }
}

impl Serialize for RatingDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for stars in (1..=5u8).rev() {
            map.serialize_entry(&stars.to_string(), &self.get(stars))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RatingSummary {
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
    pub distribution: RatingDistribution,
}

impl RatingSummary {
    pub fn from_counts(rows: &[(i32, i64)]) -> Self {
        let distribution = RatingDistribution::from_rows(rows);
        Self {
            average_rating: distribution.average().map(round2),
            total_reviews: distribution.total(),
            distribution,
        }
    }
}

/// Average and count of approved reviews for one target.
#[derive(Debug, Clone, PartialEq, serde::Serialize, FromRow)]
pub struct ReviewStats {
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
}

impl ReviewStats {
    pub fn rounded(mut self) -> Self {
        self.average_rating = self.average_rating.map(round2);
        self
    }
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / total × 100` to two decimals; 0 when `total` is 0.
pub fn ratio_percent(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Passed interviews over completed (non-pending) interviews, as a percentage.
pub fn pass_rate(results: &[BucketCount]) -> f64 {
    let completed: i64 = results.iter().map(|r| r.count).sum();
    let passed: i64 = results
        .iter()
        .filter(|r| r.label.as_deref() == Some("pass"))
        .map(|r| r.count)
        .sum();
    ratio_percent(passed, completed)
}

/// Applications per view, or `None` when nothing was viewed.
pub fn conversion_rate(applications: i64, views: i64) -> Option<f64> {
    if views <= 0 {
        return None;
    }
    Some(round_to(applications as f64 / views as f64, 4))
}

/// Minimum-salary bands, ascending.
pub const SALARY_BANDS: [&str; 6] = ["0-5k", "5k-10k", "10k-15k", "15k-20k", "20k-30k", "30k+"];

pub fn salary_band(salary_min: i32) -> &'static str {
    match salary_min {
        i32::MIN..=4999 => SALARY_BANDS[0],
        5000..=10000 => SALARY_BANDS[1],
        10001..=15000 => SALARY_BANDS[2],
        15001..=20000 => SALARY_BANDS[3],
        20001..=30000 => SALARY_BANDS[4],
        _ => SALARY_BANDS[5],
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SalaryBandCount {
    pub range: &'static str,
    pub count: i64,
}

/// Folds `(salary_min, count)` rows into bands, ascending, empty bands omitted.
pub fn salary_distribution(rows: &[(i32, i64)]) -> Vec<SalaryBandCount> {
    let mut counts = [0i64; SALARY_BANDS.len()];
    for &(salary_min, count) in rows {
        let band = salary_band(salary_min);
        if let Some(index) = SALARY_BANDS.iter().position(|b| *b == band) {
            counts[index] += count;
        }
    }
    SALARY_BANDS
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(range, count)| SalaryBandCount {
            range: *range,
            count,
        })
        .collect()
}

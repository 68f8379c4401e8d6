//! Review statistics, rankings and the moderation analytics report.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::{ReviewTargetType, APPROVED_STATUS};
use crate::statistics::aggregates::{
    finalize_trend, ratio_percent, round2, BucketCount, RatingDistribution, RatingSummary,
    RatingTrendPoint, TREND_BUCKETS,
};
use crate::statistics::keywords::KeywordStats;
use crate::statistics::period::Period;

/// Targets need this many approved reviews to appear in `highest_rated`.
pub const MIN_REVIEWS_FOR_RATING_RANK: i64 = 3;

#[derive(Debug, Serialize)]
pub struct ReviewStatistics {
    pub target_type: ReviewTargetType,
    pub target_id: Option<Uuid>,
    pub stats: RatingSummary,
    /// Only computed for a single target.
    pub keyword_stats: Option<KeywordStats>,
    pub trend: Vec<RatingTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RankingRow {
    pub target_id: Uuid,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Display data for a ranked target: job title, company name or job seeker name,
/// plus one secondary detail (company, industry, username).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TargetLabel {
    pub id: Uuid,
    pub name: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub target_id: Uuid,
    pub average_rating: f64,
    pub review_count: i64,
    pub target: TargetLabel,
}

#[derive(Debug, Serialize)]
pub struct ReviewRankings {
    pub target_type: ReviewTargetType,
    pub highest_rated: Vec<RankingEntry>,
    pub most_reviewed: Vec<RankingEntry>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AnonymousShare {
    pub count: i64,
    pub ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct ReviewAnalytics {
    pub period: Period,
    pub total_reviews: i64,
    pub new_reviews: i64,
    pub status_distribution: Vec<BucketCount>,
    pub target_type_distribution: Vec<BucketCount>,
    pub rating_distribution: RatingDistribution,
    pub trend: Vec<RatingTrendPoint>,
    pub anonymous: AnonymousShare,
}

/// Pairs ranking rows with their labels, keeping row order.
/// Rows whose target no longer exists are dropped.
pub fn attach_labels(rows: Vec<RankingRow>, labels: &HashMap<Uuid, TargetLabel>) -> Vec<RankingEntry> {
    rows.into_iter()
        .filter_map(|row| {
            let target = labels.get(&row.target_id)?.clone();
            Some(RankingEntry {
                target_id: row.target_id,
                average_rating: round2(row.average_rating.unwrap_or(0.0)),
                review_count: row.review_count,
                target,
            })
        })
        .collect()
}

pub async fn review_statistics(
    pool: &PgPool,
    target_type: ReviewTargetType,
    target_id: Option<Uuid>,
) -> Result<ReviewStatistics, AppError> {
    let rating_rows = sqlx::query_as::<_, (i32, i64)>(
        r#"
        SELECT rating, COUNT(*)
        FROM reviews
        WHERE target_type = $1
          AND ($2::uuid IS NULL OR target_id = $2)
          AND status = $3
        GROUP BY rating
        "#,
    )
    .bind(target_type.as_str())
    .bind(target_id)
    .bind(APPROVED_STATUS)
    .fetch_all(pool)
    .await?;

    let keyword_stats = match target_id {
        Some(id) => {
            let texts = sqlx::query_as::<_, (Option<String>, Option<String>)>(
                r#"
                SELECT pros, cons
                FROM reviews
                WHERE target_type = $1 AND target_id = $2 AND status = $3
                ORDER BY created_at
                "#,
            )
            .bind(target_type.as_str())
            .bind(id)
            .bind(APPROVED_STATUS)
            .fetch_all(pool)
            .await?;
            Some(KeywordStats::from_reviews(&texts))
        }
        None => None,
    };

    let trend = sqlx::query_as::<_, RatingTrendPoint>(
        r#"
        SELECT to_char(created_at, 'YYYY-MM') AS bucket,
               COUNT(*) AS count,
               AVG(rating)::float8 AS average_rating
        FROM reviews
        WHERE target_type = $1
          AND ($2::uuid IS NULL OR target_id = $2)
          AND status = $3
        GROUP BY bucket
        ORDER BY bucket DESC
        LIMIT $4
        "#,
    )
    .bind(target_type.as_str())
    .bind(target_id)
    .bind(APPROVED_STATUS)
    .bind(TREND_BUCKETS as i64)
    .fetch_all(pool)
    .await?;

    Ok(ReviewStatistics {
        target_type,
        target_id,
        stats: RatingSummary::from_counts(&rating_rows),
        keyword_stats,
        trend: finalize_trend(trend)
            .into_iter()
            .map(RatingTrendPoint::rounded)
            .collect(),
    })
}

async fn load_labels(
    pool: &PgPool,
    target_type: ReviewTargetType,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, TargetLabel>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = match target_type {
        ReviewTargetType::Job => {
            r#"
            SELECT j.id, j.title AS name, c.name AS detail
            FROM jobs j
            LEFT JOIN companies c ON c.id = j.company_id
            WHERE j.id = ANY($1)
            "#
        }
        ReviewTargetType::Company => {
            "SELECT id, name, industry AS detail FROM companies WHERE id = ANY($1)"
        }
        ReviewTargetType::Jobseeker => {
            r#"
            SELECT s.id, s.full_name AS name, u.username AS detail
            FROM jobseekers s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.id = ANY($1)
            "#
        }
    };
    let labels = sqlx::query_as::<_, TargetLabel>(sql)
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(labels.into_iter().map(|label| (label.id, label)).collect())
}

pub async fn review_rankings(
    pool: &PgPool,
    target_type: ReviewTargetType,
    limit: i64,
) -> Result<ReviewRankings, AppError> {
    let highest_rated = sqlx::query_as::<_, RankingRow>(
        r#"
        SELECT target_id, AVG(rating)::float8 AS average_rating, COUNT(*) AS review_count
        FROM reviews
        WHERE target_type = $1 AND status = $2
        GROUP BY target_id
        HAVING COUNT(*) >= $3
        ORDER BY average_rating DESC, review_count DESC
        LIMIT $4
        "#,
    )
    .bind(target_type.as_str())
    .bind(APPROVED_STATUS)
    .bind(MIN_REVIEWS_FOR_RATING_RANK)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let most_reviewed = sqlx::query_as::<_, RankingRow>(
        r#"
        SELECT target_id, AVG(rating)::float8 AS average_rating, COUNT(*) AS review_count
        FROM reviews
        WHERE target_type = $1 AND status = $2
        GROUP BY target_id
        ORDER BY review_count DESC, average_rating DESC
        LIMIT $3
        "#,
    )
    .bind(target_type.as_str())
    .bind(APPROVED_STATUS)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut ids: Vec<Uuid> = highest_rated
        .iter()
        .chain(most_reviewed.iter())
        .map(|row| row.target_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let labels = load_labels(pool, target_type, &ids).await?;
    if labels.len() < ids.len() {
        warn!(
            "{} ranked {} targets no longer exist",
            ids.len() - labels.len(),
            target_type.as_str()
        );
    }

    Ok(ReviewRankings {
        target_type,
        highest_rated: attach_labels(highest_rated, &labels),
        most_reviewed: attach_labels(most_reviewed, &labels),
    })
}

pub async fn review_analytics(pool: &PgPool, period: Period) -> Result<ReviewAnalytics, AppError> {
    let since = period.cutoff(Utc::now());

    let total_reviews = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await?;
    let new_reviews = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE created_at >= $1")
        .bind(since)
        .fetch_one(pool)
        .await?;

    let status_distribution = sqlx::query_as::<_, BucketCount>(
        "SELECT status AS label, COUNT(*) AS count FROM reviews GROUP BY status ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    let target_type_distribution = sqlx::query_as::<_, BucketCount>(
        "SELECT target_type AS label, COUNT(*) AS count FROM reviews GROUP BY target_type ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    let rating_rows = sqlx::query_as::<_, (i32, i64)>(
        "SELECT rating, COUNT(*) FROM reviews GROUP BY rating",
    )
    .fetch_all(pool)
    .await?;

    // Daily buckets are bounded by the period, so the series is not capped.
    let trend = sqlx::query_as::<_, RatingTrendPoint>(
        r#"
        SELECT to_char(created_at, 'YYYY-MM-DD') AS bucket,
               COUNT(*) AS count,
               AVG(rating)::float8 AS average_rating
        FROM reviews
        WHERE created_at >= $1
        GROUP BY bucket
        ORDER BY bucket
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    let anonymous = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE is_anonymous")
        .fetch_one(pool)
        .await?;

    info!("Computed review analytics for period {period:?}");

    Ok(ReviewAnalytics {
        period,
        total_reviews,
        new_reviews,
        status_distribution,
        target_type_distribution,
        rating_distribution: RatingDistribution::from_rows(&rating_rows),
        trend: trend.into_iter().map(RatingTrendPoint::rounded).collect(),
        anonymous: AnonymousShare {
            count: anonymous,
            ratio: ratio_percent(anonymous, total_reviews),
        },
    })
}

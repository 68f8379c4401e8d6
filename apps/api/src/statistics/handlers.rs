use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{Path, Query};
use crate::models::review::ReviewTargetType;
use crate::state::AppState;
use crate::statistics::period::Period;
use crate::statistics::reports::{
    company_report, jobs_overview, jobseeker_report, platform_report, CompanyReport,
    JobSeekerReport, JobsOverview, PlatformReport,
};
use crate::statistics::reviews::{
    review_analytics, review_rankings, review_statistics, ReviewAnalytics, ReviewRankings,
    ReviewStatistics,
};

const DEFAULT_RANKING_LIMIT: i64 = 10;
const MAX_RANKING_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewStatisticsQuery {
    pub target_type: Option<String>,
    pub target_id: Option<String>,
}

#[derive(Deserialize)]
pub struct RankingsQuery {
    pub target_type: Option<String>,
    pub limit: Option<String>,
}

/// Blank means "all targets of the type".
fn parse_target_id(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| AppError::Validation(format!("invalid target_id '{value}'"))),
    }
}

fn parse_ranking_limit(raw: Option<&str>) -> Result<i64, AppError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_RANKING_LIMIT);
    };
    match value.parse::<i64>() {
        Ok(limit) if (1..=MAX_RANKING_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(AppError::Validation(format!(
            "limit must be an integer between 1 and {MAX_RANKING_LIMIT}, got '{value}'"
        ))),
    }
}

/// GET /api/v1/statistics/jobs
pub async fn handle_jobs_statistics(
    State(state): State<AppState>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<JobsOverview>, AppError> {
    let period = Period::parse(params.period.as_deref());
    Ok(Json(jobs_overview(&state.db, period).await?))
}

/// GET /api/v1/statistics/companies/:company_id
pub async fn handle_company_statistics(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<CompanyReport>, AppError> {
    Ok(Json(company_report(&state.db, company_id).await?))
}

/// GET /api/v1/statistics/jobseekers/:jobseeker_id
pub async fn handle_jobseeker_statistics(
    State(state): State<AppState>,
    Path(jobseeker_id): Path<Uuid>,
) -> Result<Json<JobSeekerReport>, AppError> {
    Ok(Json(jobseeker_report(&state.db, jobseeker_id).await?))
}

/// GET /api/v1/statistics/platform
pub async fn handle_platform_statistics(
    State(state): State<AppState>,
) -> Result<Json<PlatformReport>, AppError> {
    Ok(Json(platform_report(&state.db).await?))
}

/// GET /api/v1/reviews/statistics
pub async fn handle_review_statistics(
    State(state): State<AppState>,
    Query(params): Query<ReviewStatisticsQuery>,
) -> Result<Json<ReviewStatistics>, AppError> {
    let target_type = ReviewTargetType::from_query(params.target_type.as_deref())?;
    let target_id = parse_target_id(params.target_id.as_deref())?;
    Ok(Json(review_statistics(&state.db, target_type, target_id).await?))
}

/// GET /api/v1/reviews/rankings
pub async fn handle_review_rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsQuery>,
) -> Result<Json<ReviewRankings>, AppError> {
    let target_type = ReviewTargetType::from_query(params.target_type.as_deref())?;
    let limit = parse_ranking_limit(params.limit.as_deref())?;
    Ok(Json(review_rankings(&state.db, target_type, limit).await?))
}

/// GET /api/v1/reviews/analytics
pub async fn handle_review_analytics(
    State(state): State<AppState>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<ReviewAnalytics>, AppError> {
    let period = Period::parse(params.period.as_deref());
    Ok(Json(review_analytics(&state.db, period).await?))
}

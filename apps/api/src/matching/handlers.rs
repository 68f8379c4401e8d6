use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::Query;
use crate::matching::ranking::ScoredJob;
use crate::matching::service::{match_resume, recommend_jobs};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobSeekerQuery {
    pub jobseeker_id: Uuid,
}

#[derive(Serialize)]
pub struct ResumeMatchResponse {
    pub matches: Vec<ScoredJob>,
}

/// GET /api/v1/jobs/recommended
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSeekerQuery>,
) -> Result<Json<Vec<ScoredJob>>, AppError> {
    let jobs = recommend_jobs(
        state.repository.as_ref(),
        params.jobseeker_id,
        state.config.recommendation_limit,
    )
    .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/resumes/match
pub async fn handle_resume_match(
    State(state): State<AppState>,
    Query(params): Query<JobSeekerQuery>,
) -> Result<Json<ResumeMatchResponse>, AppError> {
    let matches = match_resume(state.repository.as_ref(), params.jobseeker_id).await?;
    Ok(Json(ResumeMatchResponse { matches }))
}

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::{score_jobs_for_candidate, ScoredJob};
use crate::matching::repository::{MatchRepository, RecommendationFilter};
use crate::matching::scorer::MatchScorer;
use crate::models::candidate::CandidateProfile;

async fn load_candidate(
    repo: &dyn MatchRepository,
    jobseeker_id: Uuid,
) -> Result<CandidateProfile, AppError> {
    repo.find_candidate(jobseeker_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job seeker {jobseeker_id} not found")))
}

/// Recommended jobs: fetch at most `limit` newest active jobs matching the
/// candidate's expectations, then score and rank that set.
pub async fn recommend_jobs(
    repo: &dyn MatchRepository,
    jobseeker_id: Uuid,
    limit: i64,
) -> Result<Vec<ScoredJob>, AppError> {
    let candidate = load_candidate(repo, jobseeker_id).await?;
    let filter = RecommendationFilter::for_candidate(&candidate);
    let pool = repo.recommendation_pool(&filter, limit).await?;

    let ranked = score_jobs_for_candidate(&MatchScorer::recommendation(), &candidate, pool);
    info!(
        "Scored {} recommended jobs for job seeker {jobseeker_id}",
        ranked.len()
    );
    Ok(ranked)
}

/// Resume match: score every active job with the resume preset.
/// Requires the candidate to have uploaded a resume.
pub async fn match_resume(
    repo: &dyn MatchRepository,
    jobseeker_id: Uuid,
) -> Result<Vec<ScoredJob>, AppError> {
    let candidate = load_candidate(repo, jobseeker_id).await?;
    if !candidate.has_resume() {
        return Err(AppError::Validation(
            "upload a resume before requesting matches".to_string(),
        ));
    }

    let jobs = repo.active_jobs().await?;
    let ranked = score_jobs_for_candidate(&MatchScorer::resume(), &candidate, jobs);
    info!(
        "Matched resume of job seeker {jobseeker_id} against {} active jobs",
        ranked.len()
    );
    Ok(ranked)
}

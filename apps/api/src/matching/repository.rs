//! Storage seam for the matching endpoints.
//!
//! `AppState` carries an `Arc<dyn MatchRepository>`; production uses
//! [`PgMatchRepository`], tests swap in an in-memory implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::escape_like;
use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, JobSeekerRow};
use crate::models::job::{JobPosting, JobRow, JobStatus};

/// Pre-scoring filter for the recommended-jobs feed, derived from a candidate's
/// expectations. Absent expectations do not restrict the pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFilter {
    pub title_contains: Option<String>,
    pub location_contains: Option<String>,
    pub min_salary_max: Option<i32>,
}

impl RecommendationFilter {
    pub fn for_candidate(candidate: &CandidateProfile) -> Self {
        Self {
            title_contains: candidate.expected_title.clone(),
            location_contains: candidate.expected_location.clone(),
            min_salary_max: candidate.expected_salary,
        }
    }

    /// In-process equivalent of the SQL predicate, for the in-memory repository.
    #[cfg(test)]
    pub fn accepts(&self, job: &JobPosting) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        let salary_ok = match self.min_salary_max {
            Some(min) => job.salary_max.map(|max| max >= min).unwrap_or(false),
            None => true,
        };
        job.status == JobStatus::Active
            && contains(&job.title, &self.title_contains)
            && contains(&job.location, &self.location_contains)
            && salary_ok
    }
}

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn find_candidate(&self, jobseeker_id: Uuid) -> Result<Option<CandidateProfile>, AppError>;

    /// Newest active jobs passing `filter`, at most `limit` of them.
    async fn recommendation_pool(
        &self,
        filter: &RecommendationFilter,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError>;

    async fn active_jobs(&self) -> Result<Vec<JobPosting>, AppError>;
}

#[derive(Clone)]
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    async fn find_candidate(&self, jobseeker_id: Uuid) -> Result<Option<CandidateProfile>, AppError> {
        let row = sqlx::query_as::<_, JobSeekerRow>(
            r#"
            SELECT id, skills, education, experience, resume_url,
                   expected_salary, expected_position, expected_location
            FROM jobseekers
            WHERE id = $1
            "#,
        )
        .bind(jobseeker_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CandidateProfile::from))
    }

    async fn recommendation_pool(
        &self,
        filter: &RecommendationFilter,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT *
            FROM jobs
            WHERE status = $1
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR location ILIKE '%' || $3 || '%')
              AND ($4::int IS NULL OR salary_max >= $4)
            ORDER BY created_at DESC
            LIMIT $5
            "#,
        )
        .bind(JobStatus::Active.as_str())
        .bind(filter.title_contains.as_deref().map(escape_like))
        .bind(filter.location_contains.as_deref().map(escape_like))
        .bind(filter.min_salary_max)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn active_jobs(&self) -> Result<Vec<JobPosting>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(JobStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }
}

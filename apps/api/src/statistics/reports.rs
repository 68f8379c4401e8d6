//! Job, company, job-seeker and platform reports. Each report runs its own
//! aggregate queries and is computed fresh per request.

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::{ReviewTargetType, APPROVED_STATUS};
use crate::statistics::aggregates::{
    conversion_rate, finalize_trend, pass_rate, salary_distribution, BucketCount, ReviewStats,
    SalaryBandCount, TrendPoint, TREND_BUCKETS,
};
use crate::statistics::period::Period;

const TOP_N: i64 = 10;

#[derive(Debug, Serialize, FromRow)]
pub struct HotJob {
    pub id: Uuid,
    pub title: String,
    pub applications: i32,
    pub views: i32,
    pub location: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ViewsToApplications {
    pub total_views: i64,
    pub total_applications: i64,
    pub conversion_rate: Option<f64>,
}

impl ViewsToApplications {
    pub fn new(total_views: i64, total_applications: i64) -> Self {
        Self {
            total_views,
            total_applications,
            conversion_rate: conversion_rate(total_applications, total_views),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobsOverview {
    pub period: Period,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub new_jobs: i64,
    pub job_type_distribution: Vec<BucketCount>,
    pub salary_distribution: Vec<SalaryBandCount>,
    pub hot_jobs: Vec<HotJob>,
    pub location_distribution: Vec<BucketCount>,
    pub views_to_applications: ViewsToApplications,
}

#[derive(Debug, Serialize)]
pub struct CompanyReport {
    pub company_id: Uuid,
    pub total_jobs: i64,
    pub total_applications: i64,
    pub total_interviews: i64,
    pub application_status_distribution: Vec<BucketCount>,
    pub interview_results: Vec<BucketCount>,
    pub pass_rate: f64,
    pub views_trend: Vec<TrendPoint>,
    pub applications_trend: Vec<TrendPoint>,
    pub review_stats: ReviewStats,
}

#[derive(Debug, Serialize)]
pub struct JobSeekerReport {
    pub jobseeker_id: Uuid,
    pub total_applications: i64,
    pub application_status_distribution: Vec<BucketCount>,
    pub total_interviews: i64,
    pub interview_result_distribution: Vec<BucketCount>,
    pub applied_job_type_distribution: Vec<BucketCount>,
    pub applied_job_location_distribution: Vec<BucketCount>,
    pub application_trend: Vec<TrendPoint>,
    pub review_stats: ReviewStats,
}

#[derive(Debug, Serialize)]
pub struct PlatformReport {
    pub total_users: i64,
    pub user_role_distribution: Vec<BucketCount>,
    pub total_companies: i64,
    pub total_job_seekers: i64,
    pub total_jobs: i64,
    pub total_applications: i64,
    pub total_interviews: i64,
    pub total_reviews: i64,
    pub user_registration_trend: Vec<TrendPoint>,
    pub job_posting_trend: Vec<TrendPoint>,
    pub application_trend: Vec<TrendPoint>,
}

async fn count(pool: &PgPool, sql: &str) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?)
}

async fn count_for(pool: &PgPool, sql: &str, id: Uuid) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

async fn buckets_for(pool: &PgPool, sql: &str, id: Uuid) -> Result<Vec<BucketCount>, AppError> {
    Ok(sqlx::query_as::<_, BucketCount>(sql)
        .bind(id)
        .fetch_all(pool)
        .await?)
}

/// Runs a newest-first trend query (`$1` = bucket cap, optional `$2` = id)
/// and returns it oldest-first.
async fn trend(pool: &PgPool, sql: &str, id: Option<Uuid>) -> Result<Vec<TrendPoint>, AppError> {
    let mut query = sqlx::query_as::<_, TrendPoint>(sql).bind(TREND_BUCKETS as i64);
    if let Some(id) = id {
        query = query.bind(id);
    }
    Ok(finalize_trend(query.fetch_all(pool).await?))
}

pub(crate) async fn review_stats_for(
    pool: &PgPool,
    target_type: ReviewTargetType,
    target_id: Uuid,
) -> Result<ReviewStats, AppError> {
    let stats = sqlx::query_as::<_, ReviewStats>(
        r#"
        SELECT AVG(rating)::float8 AS average_rating, COUNT(*) AS total_reviews
        FROM reviews
        WHERE target_type = $1 AND target_id = $2 AND status = $3
        "#,
    )
    .bind(target_type.as_str())
    .bind(target_id)
    .bind(APPROVED_STATUS)
    .fetch_one(pool)
    .await?;
    Ok(stats.rounded())
}

async fn ensure_exists(pool: &PgPool, table: &str, id: Uuid, what: &str) -> Result<(), AppError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{what} {id} not found")))
    }
}

pub async fn jobs_overview(pool: &PgPool, period: Period) -> Result<JobsOverview, AppError> {
    let since = period.cutoff(Utc::now());

    let total_jobs = count(pool, "SELECT COUNT(*) FROM jobs").await?;
    let active_jobs = count(pool, "SELECT COUNT(*) FROM jobs WHERE status = 'active'").await?;
    let new_jobs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE created_at >= $1")
        .bind(since)
        .fetch_one(pool)
        .await?;

    let job_type_distribution = sqlx::query_as::<_, BucketCount>(
        "SELECT job_type AS label, COUNT(*) AS count FROM jobs GROUP BY job_type ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    let salary_rows = sqlx::query_as::<_, (i32, i64)>(
        "SELECT salary_min, COUNT(*) FROM jobs WHERE salary_min IS NOT NULL GROUP BY salary_min",
    )
    .fetch_all(pool)
    .await?;

    let hot_jobs = sqlx::query_as::<_, HotJob>(
        r#"
        SELECT id, title, applications, views, location, salary_min, salary_max
        FROM jobs
        ORDER BY applications DESC, created_at DESC
        LIMIT $1
        "#,
    )
    .bind(TOP_N)
    .fetch_all(pool)
    .await?;

    let location_distribution = sqlx::query_as::<_, BucketCount>(
        r#"
        SELECT location AS label, COUNT(*) AS count
        FROM jobs
        GROUP BY location
        ORDER BY count DESC, location
        LIMIT $1
        "#,
    )
    .bind(TOP_N)
    .fetch_all(pool)
    .await?;

    let (total_views, total_applications) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COALESCE(SUM(views), 0)::bigint, COALESCE(SUM(applications), 0)::bigint FROM jobs",
    )
    .fetch_one(pool)
    .await?;

    info!("Computed jobs overview for period {period:?}");

    Ok(JobsOverview {
        period,
        total_jobs,
        active_jobs,
        new_jobs,
        job_type_distribution,
        salary_distribution: salary_distribution(&salary_rows),
        hot_jobs,
        location_distribution,
        views_to_applications: ViewsToApplications::new(total_views, total_applications),
    })
}

pub async fn company_report(pool: &PgPool, company_id: Uuid) -> Result<CompanyReport, AppError> {
    ensure_exists(pool, "companies", company_id, "Company").await?;

    let total_jobs = count_for(pool, "SELECT COUNT(*) FROM jobs WHERE company_id = $1", company_id).await?;
    let total_applications = count_for(
        pool,
        r#"
        SELECT COUNT(*)
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE j.company_id = $1
        "#,
        company_id,
    )
    .await?;
    let total_interviews = count_for(
        pool,
        r#"
        SELECT COUNT(*)
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        JOIN jobs j ON j.id = a.job_id
        WHERE j.company_id = $1
        "#,
        company_id,
    )
    .await?;

    let application_status_distribution = buckets_for(
        pool,
        r#"
        SELECT a.status AS label, COUNT(*) AS count
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE j.company_id = $1
        GROUP BY a.status
        ORDER BY count DESC
        "#,
        company_id,
    )
    .await?;

    let interview_results = buckets_for(
        pool,
        r#"
        SELECT i.result AS label, COUNT(*) AS count
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        JOIN jobs j ON j.id = a.job_id
        WHERE j.company_id = $1 AND i.result <> 'pending'
        GROUP BY i.result
        ORDER BY count DESC
        "#,
        company_id,
    )
    .await?;

    let views_trend = trend(
        pool,
        r#"
        SELECT to_char(created_at, 'IYYY-"W"IW') AS bucket,
               COALESCE(SUM(views), 0)::bigint AS total
        FROM jobs
        WHERE company_id = $2
        GROUP BY bucket
        ORDER BY bucket DESC
        LIMIT $1
        "#,
        Some(company_id),
    )
    .await?;

    let applications_trend = trend(
        pool,
        r#"
        SELECT to_char(a.created_at, 'IYYY-"W"IW') AS bucket, COUNT(*) AS total
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE j.company_id = $2
        GROUP BY bucket
        ORDER BY bucket DESC
        LIMIT $1
        "#,
        Some(company_id),
    )
    .await?;

    let review_stats = review_stats_for(pool, ReviewTargetType::Company, company_id).await?;

    info!("Computed statistics for company {company_id}");

    Ok(CompanyReport {
        company_id,
        total_jobs,
        total_applications,
        total_interviews,
        pass_rate: pass_rate(&interview_results),
        application_status_distribution,
        interview_results,
        views_trend,
        applications_trend,
        review_stats,
    })
}

pub async fn jobseeker_report(
    pool: &PgPool,
    jobseeker_id: Uuid,
) -> Result<JobSeekerReport, AppError> {
    ensure_exists(pool, "jobseekers", jobseeker_id, "Job seeker").await?;

    let total_applications = count_for(
        pool,
        "SELECT COUNT(*) FROM applications WHERE jobseeker_id = $1",
        jobseeker_id,
    )
    .await?;

    let application_status_distribution = buckets_for(
        pool,
        r#"
        SELECT status AS label, COUNT(*) AS count
        FROM applications
        WHERE jobseeker_id = $1
        GROUP BY status
        ORDER BY count DESC
        "#,
        jobseeker_id,
    )
    .await?;

    let total_interviews = count_for(
        pool,
        r#"
        SELECT COUNT(*)
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        WHERE a.jobseeker_id = $1
        "#,
        jobseeker_id,
    )
    .await?;

    let interview_result_distribution = buckets_for(
        pool,
        r#"
        SELECT i.result AS label, COUNT(*) AS count
        FROM interviews i
        JOIN applications a ON a.id = i.application_id
        WHERE a.jobseeker_id = $1
        GROUP BY i.result
        ORDER BY count DESC
        "#,
        jobseeker_id,
    )
    .await?;

    let applied_job_type_distribution = buckets_for(
        pool,
        r#"
        SELECT j.job_type AS label, COUNT(*) AS count
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.jobseeker_id = $1
        GROUP BY j.job_type
        ORDER BY count DESC
        "#,
        jobseeker_id,
    )
    .await?;

    let applied_job_location_distribution = buckets_for(
        pool,
        r#"
        SELECT j.location AS label, COUNT(*) AS count
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.jobseeker_id = $1
        GROUP BY j.location
        ORDER BY count DESC
        "#,
        jobseeker_id,
    )
    .await?;

    let application_trend = trend(
        pool,
        r#"
        SELECT to_char(created_at, 'IYYY-"W"IW') AS bucket, COUNT(*) AS total
        FROM applications
        WHERE jobseeker_id = $2
        GROUP BY bucket
        ORDER BY bucket DESC
        LIMIT $1
        "#,
        Some(jobseeker_id),
    )
    .await?;

    let review_stats = review_stats_for(pool, ReviewTargetType::Jobseeker, jobseeker_id).await?;

    info!("Computed statistics for job seeker {jobseeker_id}");

    Ok(JobSeekerReport {
        jobseeker_id,
        total_applications,
        application_status_distribution,
        total_interviews,
        interview_result_distribution,
        applied_job_type_distribution,
        applied_job_location_distribution,
        application_trend,
        review_stats,
    })
}

pub async fn platform_report(pool: &PgPool) -> Result<PlatformReport, AppError> {
    let total_users = count(pool, "SELECT COUNT(*) FROM users").await?;
    let user_role_distribution = sqlx::query_as::<_, BucketCount>(
        "SELECT role AS label, COUNT(*) AS count FROM users GROUP BY role ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    let total_companies = count(pool, "SELECT COUNT(*) FROM companies").await?;
    let total_job_seekers = count(pool, "SELECT COUNT(*) FROM jobseekers").await?;
    let total_jobs = count(pool, "SELECT COUNT(*) FROM jobs").await?;
    let total_applications = count(pool, "SELECT COUNT(*) FROM applications").await?;
    let total_interviews = count(pool, "SELECT COUNT(*) FROM interviews").await?;
    let total_reviews = count(pool, "SELECT COUNT(*) FROM reviews").await?;

    let monthly = |table: &str| {
        format!(
            r#"
            SELECT to_char(created_at, 'YYYY-MM') AS bucket, COUNT(*) AS total
            FROM {table}
            GROUP BY bucket
            ORDER BY bucket DESC
            LIMIT $1
            "#
        )
    };
    let user_registration_trend = trend(pool, &monthly("users"), None).await?;
    let job_posting_trend = trend(pool, &monthly("jobs"), None).await?;
    let application_trend = trend(pool, &monthly("applications"), None).await?;

    info!("Computed platform statistics ({total_users} users, {total_jobs} jobs)");

    Ok(PlatformReport {
        total_users,
        user_role_distribution,
        total_companies,
        total_job_seekers,
        total_jobs,
        total_applications,
        total_interviews,
        total_reviews,
        user_registration_trend,
        job_posting_trend,
        application_trend,
    })
}

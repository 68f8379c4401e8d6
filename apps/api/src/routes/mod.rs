pub mod health;

use axum::{routing::get, Router};

use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::statistics::handlers as statistics;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching
        .route(
            "/api/v1/jobs/recommended",
            get(matching::handle_recommended_jobs),
        )
        .route("/api/v1/resumes/match", get(matching::handle_resume_match))
        // Statistics
        .route(
            "/api/v1/statistics/jobs",
            get(statistics::handle_jobs_statistics),
        )
        .route(
            "/api/v1/statistics/companies/:company_id",
            get(statistics::handle_company_statistics),
        )
        .route(
            "/api/v1/statistics/jobseekers/:jobseeker_id",
            get(statistics::handle_jobseeker_statistics),
        )
        .route(
            "/api/v1/statistics/platform",
            get(statistics::handle_platform_statistics),
        )
        // Reviews
        .route(
            "/api/v1/reviews/statistics",
            get(statistics::handle_review_statistics),
        )
        .route(
            "/api/v1/reviews/rankings",
            get(statistics::handle_review_rankings),
        )
        .route(
            "/api/v1/reviews/analytics",
            get(statistics::handle_review_analytics),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::matching::repository::memory::InMemoryMatchRepository;
    use crate::models::candidate::CandidateProfile;
    use crate::models::job::{JobPosting, JobStatus};

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/recruit_test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            db_max_connections: 1,
            recommendation_limit: 10,
        }
    }

    /// The pool never connects; only routes that stay off the database are exercised.
    fn test_app(repository: InMemoryMatchRepository) -> Router {
        let config = test_config();
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        build_router(AppState {
            db,
            config,
            repository: Arc::new(repository),
        })
    }

    fn make_job(title: &str, skills: &[&str], age_days: i64) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            location: "杭州".to_string(),
            job_type: Some("full-time".to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education_required: None,
            experience_required: None,
            salary_min: Some(15000),
            salary_max: Some(25000),
            status: JobStatus::Active,
            views: 0,
            applications: 0,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_app(InMemoryMatchRepository::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_recommended_jobs_sorted_by_score() {
        let candidate = CandidateProfile {
            id: Uuid::new_v4(),
            skills: vec!["rust".to_string(), "tokio".to_string()],
            ..CandidateProfile::default()
        };
        let repository = InMemoryMatchRepository {
            candidates: vec![candidate.clone()],
            jobs: vec![
                make_job("Go developer", &["go", "grpc"], 0),
                make_job("Rust developer", &["rust", "tokio"], 1),
                make_job("Systems developer", &["rust", "c++"], 2),
            ],
        };

        let uri = format!("/api/v1/jobs/recommended?jobseeker_id={}", candidate.id);
        let (status, body) = get_json(test_app(repository), &uri).await;
        assert_eq!(status, StatusCode::OK);

        let scores: Vec<u64> = body
            .as_array()
            .expect("array body")
            .iter()
            .map(|item| item["match_score"].as_u64().unwrap())
            .collect();
        assert_eq!(scores, vec![100, 50, 0]);
        assert_eq!(body[0]["job"]["title"], "Rust developer");
        assert_eq!(body[0]["job"]["status"], "active");
    }

    #[tokio::test]
    async fn test_recommended_jobs_unknown_jobseeker_is_404() {
        let uri = format!("/api/v1/jobs/recommended?jobseeker_id={}", Uuid::new_v4());
        let (status, body) = get_json(test_app(InMemoryMatchRepository::default()), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_jobseeker_id_is_json_400() {
        for uri in [
            "/api/v1/jobs/recommended?jobseeker_id=not-a-uuid",
            "/api/v1/jobs/recommended",
            "/api/v1/resumes/match?jobseeker_id=42",
        ] {
            let (status, body) = get_json(test_app(InMemoryMatchRepository::default()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
            assert!(body["error"]["message"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_non_uuid_path_id_is_json_400() {
        for uri in [
            "/api/v1/statistics/companies/not-a-uuid",
            "/api/v1/statistics/jobseekers/123",
        ] {
            let (status, body) = get_json(test_app(InMemoryMatchRepository::default()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_resume_match_without_resume_is_400() {
        let candidate = CandidateProfile {
            id: Uuid::new_v4(),
            ..CandidateProfile::default()
        };
        let repository = InMemoryMatchRepository {
            candidates: vec![candidate.clone()],
            jobs: vec![],
        };
        let uri = format!("/api/v1/resumes/match?jobseeker_id={}", candidate.id);
        let (status, body) = get_json(test_app(repository), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_review_statistics_rejects_invalid_target_type() {
        let (status, body) = get_json(
            test_app(InMemoryMatchRepository::default()),
            "/api/v1/reviews/statistics?target_type=user",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_review_rankings_rejects_invalid_limit() {
        let (status, _) = get_json(
            test_app(InMemoryMatchRepository::default()),
            "/api/v1/reviews/rankings?target_type=company&limit=0",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_review_rankings_requires_target_type() {
        let (status, _) = get_json(
            test_app(InMemoryMatchRepository::default()),
            "/api/v1/reviews/rankings",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

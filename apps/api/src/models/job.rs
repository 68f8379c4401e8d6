use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::skills::normalize_skills;
use crate::models::candidate::{lenient_list, non_blank, SkillEntry};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Active,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(JobStatus::Draft),
            "active" => Some(JobStatus::Active),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: Option<String>,
    pub skills: Option<Value>,
    pub education_required: Option<String>,
    pub experience_required: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub status: String,
    pub views: i32,
    pub applications: i32,
    pub created_at: DateTime<Utc>,
}

/// Job posting as consumed by the match scorer and returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobPosting {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: Option<String>,
    pub skills: Vec<String>,
    pub education_required: Option<String>,
    pub experience_required: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub status: JobStatus,
    pub views: i32,
    pub applications: i32,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        let skills: Vec<SkillEntry> = lenient_list(row.skills.as_ref());
        // The column carries a CHECK constraint; anything else is never shown as live.
        let status = JobStatus::parse(&row.status).unwrap_or(JobStatus::Draft);
        JobPosting {
            id: row.id,
            company_id: row.company_id,
            title: row.title,
            description: row.description,
            location: row.location,
            job_type: row.job_type,
            skills: normalize_skills(&skills),
            education_required: non_blank(row.education_required),
            experience_required: non_blank(row.experience_required),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            status,
            views: row.views,
            applications: row.applications,
            created_at: row.created_at,
        }
    }
}

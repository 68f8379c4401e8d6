use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Only moderated reviews feed public statistics and rankings.
pub const APPROVED_STATUS: &str = "approved";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTargetType {
    Job,
    Company,
    Jobseeker,
}

impl ReviewTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewTargetType::Job => "job",
            ReviewTargetType::Company => "company",
            ReviewTargetType::Jobseeker => "jobseeker",
        }
    }

    /// Parses a required `target_type` query value.
    pub fn from_query(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            Some("job") => Ok(ReviewTargetType::Job),
            Some("company") => Ok(ReviewTargetType::Company),
            Some("jobseeker") => Ok(ReviewTargetType::Jobseeker),
            Some(other) => Err(AppError::Validation(format!(
                "invalid target_type '{other}': expected job, company or jobseeker"
            ))),
            None => Err(AppError::Validation("target_type is required".to_string())),
        }
    }
}

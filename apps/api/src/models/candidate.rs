use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::skills::normalize_skills;

/// A skill as persisted in a JSON column: a bare name, or an object carrying one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SkillEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        level: Option<String>,
    },
}

impl SkillEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            SkillEntry::Name(name) => Some(name),
            SkillEntry::Detailed { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EducationRecord {
    #[serde(default, alias = "level")]
    pub degree: Option<String>,
    #[serde(default, alias = "major")]
    pub field: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperienceRecord {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, alias = "workYears", alias = "years")]
    pub work_years: Option<f64>,
}

/// Matching-relevant columns of `jobseekers`.
#[derive(Debug, Clone, FromRow)]
pub struct JobSeekerRow {
    pub id: Uuid,
    pub skills: Option<Value>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
    pub resume_url: Option<String>,
    pub expected_salary: Option<i32>,
    pub expected_position: Option<String>,
    pub expected_location: Option<String>,
}

/// Job-seeker profile as consumed by the match scorer.
/// Skills are already normalized; the JSON shape ambiguity ends here.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub skills: Vec<String>,
    pub expected_title: Option<String>,
    pub expected_location: Option<String>,
    pub expected_salary: Option<i32>,
    pub education: Vec<EducationRecord>,
    pub experience: Vec<ExperienceRecord>,
    pub resume_url: Option<String>,
}

impl CandidateProfile {
    pub fn total_experience_years(&self) -> f64 {
        self.experience
            .iter()
            .filter_map(|e| e.work_years)
            .filter(|years| years.is_finite())
            .sum()
    }

    pub fn has_resume(&self) -> bool {
        self.resume_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false)
    }
}

impl From<JobSeekerRow> for CandidateProfile {
    fn from(row: JobSeekerRow) -> Self {
        let skills: Vec<SkillEntry> = lenient_list(row.skills.as_ref());
        CandidateProfile {
            id: row.id,
            skills: normalize_skills(&skills),
            expected_title: non_blank(row.expected_position),
            expected_location: non_blank(row.expected_location),
            expected_salary: row.expected_salary,
            education: lenient_list(row.education.as_ref()),
            experience: lenient_list(row.experience.as_ref()),
            resume_url: row.resume_url,
        }
    }
}

/// Decodes a JSON array element by element, skipping elements of the wrong shape.
/// Anything that is not an array yields an empty list.
pub fn lenient_list<T: DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_row(skills: Value, education: Value, experience: Value) -> JobSeekerRow {
        JobSeekerRow {
            id: Uuid::new_v4(),
            skills: Some(skills),
            education: Some(education),
            experience: Some(experience),
            resume_url: None,
            expected_salary: Some(15000),
            expected_position: Some("  前端工程师 ".to_string()),
            expected_location: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_skill_entries_accept_strings_and_objects() {
        let entries: Vec<SkillEntry> = lenient_list(Some(&json!([
            "React",
            {"name": "Node.js", "level": "expert"},
            {"level": "beginner"},
            42
        ])));
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name(), Some("React"));
        assert_eq!(entries[1].name(), Some("Node.js"));
        assert_eq!(entries[2].name(), None);
    }

    #[test]
    fn test_profile_conversion_normalizes_and_trims() {
        let row = make_row(
            json!([" React ", {"name": "NODE"}, ""]),
            json!([{"degree": "本科", "field": "计算机"}]),
            json!([{"workYears": 2}, {"work_years": 1.5}, "garbage"]),
        );
        let profile = CandidateProfile::from(row);

        assert_eq!(profile.skills, vec!["react", "node"]);
        assert_eq!(profile.expected_title.as_deref(), Some("前端工程师"));
        assert_eq!(profile.expected_location, None);
        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.experience.len(), 2);
        assert!((profile.total_experience_years() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_array_json_yields_empty_lists() {
        let row = make_row(json!({"skills": "react"}), Value::Null, json!("5 years"));
        let profile = CandidateProfile::from(row);
        assert!(profile.skills.is_empty());
        assert!(profile.education.is_empty());
        assert_eq!(profile.total_experience_years(), 0.0);
    }

    #[test]
    fn test_has_resume_ignores_blank_urls() {
        let mut profile = CandidateProfile::default();
        assert!(!profile.has_resume());
        profile.resume_url = Some(" ".to_string());
        assert!(!profile.has_resume());
        profile.resume_url = Some("/uploads/resumes/a.pdf".to_string());
        assert!(profile.has_resume());
    }
}

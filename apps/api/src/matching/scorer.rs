//! Additive, ceiling-weighted compatibility between a candidate
//! and a job posting.
//!
//! One scoring scheme, parameterized by [`MatchWeights`]. The two endpoints that
//! rank jobs pick a named preset rather than carrying their own arithmetic:
//!
//! | criterion  | recommendation | resume |
//! |------------|----------------|--------|
//! | skills     | 100            | 50     |
//! | title      | 20             | 20     |
//! | location   | 20             | 20     |
//! | education  | 0              | 20     |
//! | experience | 0              | 30     |
//!
//! The sum is clamped to 100 and rounded. Missing inputs contribute 0.

use crate::matching::skills::{count_matched_skills, cross_contains, titles_match_ignoring_qualifiers};
use crate::models::candidate::{CandidateProfile, EducationRecord};
use crate::models::job::JobPosting;

pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    pub skills: f64,
    pub title: f64,
    pub location: f64,
    pub education: f64,
    pub experience: f64,
}

impl MatchWeights {
    /// Used by the recommended-jobs feed.
    pub const fn recommendation() -> Self {
        Self {
            skills: 100.0,
            title: 20.0,
            location: 20.0,
            education: 0.0,
            experience: 0.0,
        }
    }

    /// Used when matching an uploaded resume against every active job.
    pub const fn resume() -> Self {
        Self {
            skills: 50.0,
            title: 20.0,
            location: 20.0,
            education: 20.0,
            experience: 30.0,
        }
    }
}

/// Ordinal education scale. Derived ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    const LADDER: [(EducationLevel, &'static [&'static str]); 5] = [
        (EducationLevel::HighSchool, &["高中", "high school"]),
        (EducationLevel::Associate, &["大专", "associate"]),
        (EducationLevel::Bachelor, &["本科", "bachelor"]),
        (EducationLevel::Master, &["硕士", "master"]),
        (EducationLevel::Doctorate, &["博士", "doctor", "phd"]),
    ];

    /// Lowest level mentioned in `text`, so "本科及以上" reads as Bachelor.
    pub fn detect(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        Self::LADDER
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(level, _)| *level)
    }

    /// Highest level recognized across a candidate's education history.
    pub fn highest(records: &[EducationRecord]) -> Option<Self> {
        records
            .iter()
            .filter_map(|r| r.degree.as_deref())
            .filter_map(Self::detect)
            .max()
    }
}

/// Per-criterion points before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub title: f64,
    pub location: f64,
    pub education: f64,
    pub experience: f64,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.skills + self.title + self.location + self.education + self.experience
    }

    pub fn final_score(&self) -> u8 {
        self.raw_total().clamp(0.0, MAX_SCORE).round() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScorer {
    weights: MatchWeights,
}

impl MatchScorer {
    pub const fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub const fn recommendation() -> Self {
        Self::new(MatchWeights::recommendation())
    }

    pub const fn resume() -> Self {
        Self::new(MatchWeights::resume())
    }

    pub fn score(&self, candidate: &CandidateProfile, job: &JobPosting) -> u8 {
        self.breakdown(candidate, job).final_score()
    }

    pub fn breakdown(&self, candidate: &CandidateProfile, job: &JobPosting) -> ScoreBreakdown {
        ScoreBreakdown {
            skills: self.skill_points(&candidate.skills, &job.skills),
            title: self.title_points(candidate.expected_title.as_deref(), &job.title),
            location: self.location_points(candidate.expected_location.as_deref(), &job.location),
            education: self
                .education_points(&candidate.education, job.education_required.as_deref()),
            experience: self.experience_points(
                candidate.total_experience_years(),
                job.experience_required.as_deref(),
            ),
        }
    }

    fn skill_points(&self, candidate_skills: &[String], job_skills: &[String]) -> f64 {
        if job_skills.is_empty() {
            return 0.0;
        }
        let matched = count_matched_skills(candidate_skills, job_skills);
        matched as f64 / job_skills.len() as f64 * self.weights.skills
    }

    fn title_points(&self, expected: Option<&str>, title: &str) -> f64 {
        match expected {
            Some(expected)
                if cross_contains(expected, title)
                    || titles_match_ignoring_qualifiers(expected, title) =>
            {
                self.weights.title
            }
            _ => 0.0,
        }
    }

    fn location_points(&self, expected: Option<&str>, location: &str) -> f64 {
        match expected {
            Some(expected) if cross_contains(expected, location) => self.weights.location,
            _ => 0.0,
        }
    }

    fn education_points(&self, history: &[EducationRecord], required: Option<&str>) -> f64 {
        let Some(required) = required.and_then(EducationLevel::detect) else {
            return 0.0;
        };
        match EducationLevel::highest(history) {
            Some(level) if level >= required => self.weights.education,
            _ => 0.0,
        }
    }

    fn experience_points(&self, candidate_years: f64, required: Option<&str>) -> f64 {
        let required_years = required.and_then(first_integer).unwrap_or(0);
        if required_years == 0 {
            return 0.0;
        }
        let required_years = required_years as f64;
        let candidate_years = candidate_years.max(0.0);
        if candidate_years >= required_years {
            self.weights.experience
        } else {
            candidate_years / required_years * self.weights.experience
        }
    }
}

/// First run of ASCII digits in `text`, e.g. 3 from "3-5年".
pub fn first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::ExperienceRecord;
    use crate::models::job::JobStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn make_candidate(skills: &[&str], title: Option<&str>, location: Option<&str>) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            skills: strings(skills),
            expected_title: title.map(str::to_string),
            expected_location: location.map(str::to_string),
            ..CandidateProfile::default()
        }
    }

    fn make_job(skills: &[&str], title: &str, location: &str) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            location: location.to_string(),
            job_type: None,
            skills: strings(skills),
            education_required: None,
            experience_required: None,
            salary_min: None,
            salary_max: None,
            status: JobStatus::Active,
            views: 0,
            applications: 0,
            created_at: Utc::now(),
        }
    }

    fn degree(level: &str) -> EducationRecord {
        EducationRecord {
            degree: Some(level.to_string()),
            ..EducationRecord::default()
        }
    }

    fn years(n: f64) -> ExperienceRecord {
        ExperienceRecord {
            work_years: Some(n),
            ..ExperienceRecord::default()
        }
    }

    #[test]
    fn test_end_to_end_example_recommendation_preset() {
        let candidate = make_candidate(&["react", "node"], Some("前端工程师"), Some("北京"));
        let job = make_job(&["react", "vue", "node.js"], "前端开发工程师", "北京市朝阳区");

        let breakdown = MatchScorer::recommendation().breakdown(&candidate, &job);
        assert!((breakdown.skills - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(breakdown.title, 20.0);
        assert_eq!(breakdown.location, 20.0);
        assert!(breakdown.raw_total() > 100.0);
        assert_eq!(breakdown.final_score(), 100);
    }

    #[test]
    fn test_end_to_end_example_resume_preset() {
        let candidate = make_candidate(&["react", "node"], Some("前端工程师"), Some("北京"));
        let job = make_job(&["react", "vue", "node.js"], "前端开发工程师", "北京市朝阳区");

        assert_eq!(MatchScorer::resume().score(&candidate, &job), 73);
    }

    #[test]
    fn test_title_points_reject_related_but_different_roles() {
        let scorer = MatchScorer::recommendation();
        let java = make_candidate(&[], Some("Java开发"), None);
        let javascript = make_job(&[], "JavaScript开发", "上海");
        assert_eq!(scorer.breakdown(&java, &javascript).title, 0.0);

        let product = make_candidate(&[], Some("产品经理"), None);
        let operations = make_job(&[], "产品运营经理", "上海");
        assert_eq!(scorer.breakdown(&product, &operations).title, 0.0);

        let senior = make_job(&[], "资深Java开发", "上海");
        assert_eq!(scorer.breakdown(&java, &senior).title, 20.0);
    }

    #[test]
    fn test_disjoint_inputs_score_zero() {
        let candidate = make_candidate(&["cobol"], Some("会计"), Some("上海"));
        let job = make_job(&["rust", "go"], "后端工程师", "深圳");

        assert_eq!(MatchScorer::recommendation().score(&candidate, &job), 0);
        assert_eq!(MatchScorer::resume().score(&candidate, &job), 0);
    }

    #[test]
    fn test_score_clamped_when_every_term_is_maximal() {
        let mut candidate = make_candidate(&["rust", "rust", "go"], Some("engineer"), Some("remote"));
        candidate.education = vec![degree("博士")];
        candidate.experience = vec![years(12.0)];
        let mut job = make_job(&["rust"], "Senior Engineer", "Remote - EU");
        job.education_required = Some("本科".to_string());
        job.experience_required = Some("5年以上".to_string());

        let breakdown = MatchScorer::resume().breakdown(&candidate, &job);
        assert!(breakdown.raw_total() > 100.0);
        assert_eq!(breakdown.final_score(), 100);
        assert_eq!(MatchScorer::recommendation().score(&candidate, &job), 100);
    }

    #[test]
    fn test_no_job_skills_contributes_zero() {
        let candidate = make_candidate(&["react"], None, None);
        let job = make_job(&[], "Designer", "Berlin");
        assert_eq!(MatchScorer::recommendation().breakdown(&candidate, &job).skills, 0.0);
    }

    #[test]
    fn test_adding_matching_skill_never_decreases_score() {
        let job = make_job(&["react", "vue", "typescript"], "前端", "杭州");
        let mut candidate = make_candidate(&["react"], None, None);
        let scorer = MatchScorer::recommendation();

        let before = scorer.score(&candidate, &job);
        candidate.skills.push("vue".to_string());
        let after = scorer.score(&candidate, &job);
        assert!(after >= before, "{after} < {before}");
        assert_eq!(before, 33);
        assert_eq!(after, 67);
    }

    #[test]
    fn test_education_is_binary_and_needs_recognized_requirement() {
        let scorer = MatchScorer::resume();
        let mut candidate = make_candidate(&[], None, None);
        candidate.education = vec![degree("大专"), degree("硕士研究生")];
        let mut job = make_job(&[], "分析师", "广州");

        job.education_required = Some("本科及以上".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).education, 20.0);

        job.education_required = Some("博士".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).education, 0.0);

        job.education_required = Some("不限".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).education, 0.0);

        candidate.education.clear();
        job.education_required = Some("高中".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).education, 0.0);
    }

    #[test]
    fn test_education_level_detection() {
        assert_eq!(EducationLevel::detect("本科及以上"), Some(EducationLevel::Bachelor));
        assert_eq!(EducationLevel::detect("Master of Science"), Some(EducationLevel::Master));
        assert_eq!(EducationLevel::detect("PhD"), Some(EducationLevel::Doctorate));
        assert_eq!(EducationLevel::detect("学历不限"), None);
        assert_eq!(EducationLevel::detect("硕士优先，本科可"), Some(EducationLevel::Bachelor));
        assert!(EducationLevel::HighSchool < EducationLevel::Doctorate);
    }

    #[test]
    fn test_experience_term() {
        let scorer = MatchScorer::resume();
        let mut candidate = make_candidate(&[], None, None);
        let mut job = make_job(&[], "运维", "成都");

        candidate.experience = vec![years(1.0), years(0.5)];
        job.experience_required = Some("3-5年".to_string());
        assert!((scorer.breakdown(&candidate, &job).experience - 15.0).abs() < 1e-9);

        candidate.experience.push(years(2.0));
        assert_eq!(scorer.breakdown(&candidate, &job).experience, 30.0);

        job.experience_required = Some("经验不限".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).experience, 0.0);

        job.experience_required = Some("0年".to_string());
        assert_eq!(scorer.breakdown(&candidate, &job).experience, 0.0);
    }

    #[test]
    fn test_recommendation_preset_ignores_education_and_experience() {
        let mut candidate = make_candidate(&[], None, None);
        candidate.education = vec![degree("博士")];
        candidate.experience = vec![years(10.0)];
        let mut job = make_job(&[], "研究员", "南京");
        job.education_required = Some("硕士".to_string());
        job.experience_required = Some("3年".to_string());

        assert_eq!(MatchScorer::recommendation().score(&candidate, &job), 0);
        assert_eq!(MatchScorer::resume().score(&candidate, &job), 50);
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("3-5年"), Some(3));
        assert_eq!(first_integer("at least 10 years"), Some(10));
        assert_eq!(first_integer("不限"), None);
        assert_eq!(first_integer("99999999999999"), None);
    }
}

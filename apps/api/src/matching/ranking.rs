use serde::Serialize;

use crate::matching::scorer::MatchScorer;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobPosting;

/// A job paired with its compatibility score for one candidate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredJob {
    pub job: JobPosting,
    pub match_score: u8,
}

/// Scores every fetched job and orders the result best-first.
/// The caller decides which jobs to fetch; nothing is dropped here.
pub fn score_jobs_for_candidate(
    scorer: &MatchScorer,
    candidate: &CandidateProfile,
    jobs: Vec<JobPosting>,
) -> Vec<ScoredJob> {
    let scored = jobs
        .into_iter()
        .map(|job| {
            let match_score = scorer.score(candidate, &job);
            ScoredJob { job, match_score }
        })
        .collect();
    rank(scored)
}

/// Descending by score. `sort_by` is stable, so equal scores keep fetch order.
pub fn rank(mut scored: Vec<ScoredJob>) -> Vec<ScoredJob> {
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored
}

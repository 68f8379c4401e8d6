//! Skill normalization and the cross-containment test shared by every
//! text criterion of the match scorer.

use crate::models::candidate::SkillEntry;

/// Lower-cases and trims skill names, dropping entries with no usable name.
/// Order is preserved and duplicates are kept.
pub fn normalize_skills(entries: &[SkillEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.name())
        .filter_map(normalize_skill)
        .collect()
}

pub fn normalize_skill(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// True when either string contains the other, ignoring case.
/// Blank input never matches.
pub fn cross_contains(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Generic seniority and "development" qualifiers that do not change the role.
const TITLE_QUALIFIERS: [&str; 6] = ["开发", "研发", "高级", "资深", "初级", "中级"];
const LATIN_TITLE_QUALIFIERS: [&str; 2] = ["senior", "junior"];

/// Lower-cased title tokens with qualifiers removed. A run of ASCII letters and
/// digits is one token; any other letter (a CJK character) is its own token.
fn title_tokens(title: &str) -> Vec<String> {
    let mut text = title.trim().to_lowercase();
    for qualifier in TITLE_QUALIFIERS {
        text = text.replace(qualifier, " ");
    }

    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if c.is_alphanumeric() {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens.retain(|token| !LATIN_TITLE_QUALIFIERS.contains(&token.as_str()));
    tokens
}

/// True when one title's tokens occur contiguously in the other's once generic
/// qualifiers are dropped, so "前端工程师" matches "前端开发工程师". ASCII words
/// only match whole: "java" never matches "javascript".
pub fn titles_match_ignoring_qualifiers(a: &str, b: &str) -> bool {
    let a = title_tokens(a);
    let b = title_tokens(b);
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return false;
    }
    long.windows(short.len()).any(|window| window == short.as_slice())
}

/// Counts candidate skills that cross-contain at least one job skill.
/// A candidate skill counts once no matter how many job skills it hits.
pub fn count_matched_skills(candidate_skills: &[String], job_skills: &[String]) -> usize {
    candidate_skills
        .iter()
        .filter(|skill| job_skills.iter().any(|job_skill| cross_contains(skill, job_skill)))
        .count()
}

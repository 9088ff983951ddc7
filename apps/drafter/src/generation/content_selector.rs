//! Content Selector: ranks and trims profile content for CV composition.
//!
//! Skills and achievements are scored, sorted by score (stable, descending) and
//! cut to `TOP_ITEMS`. Past roles keep their order; a role whose score falls
//! below the description threshold is passed on without its description.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::job::JobDescription;
use crate::generation::relevance::{score_all, RelevanceScorer, ScoredItem};
use crate::models::profile::{CandidateProfile, PastRole, PersonalDetails};

/// Skills and achievements kept after ranking.
pub const TOP_ITEMS: usize = 10;

/// Minimum role score for keeping the role's description.
///
/// NOTE: scores come from the 1-10 relevance scale, so no role reaches 80 and
/// every description is dropped. See DESIGN.md before changing the value.
pub const ROLE_DESCRIPTION_THRESHOLD: u8 = 80;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A past role as handed to the CV composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRole {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The composer's input: profile content after ranking and redaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCv {
    pub personal: PersonalDetails,
    pub qualifications: Vec<String>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub experience: Vec<CvRole>,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Scores, ranks, and redacts the profile into a `StructuredCv`.
///
/// Steps:
/// 1. Score every skill and achievement; keep the top `TOP_ITEMS` of each
/// 2. Score every past role; drop descriptions below `ROLE_DESCRIPTION_THRESHOLD`
pub async fn select_content(
    profile: &CandidateProfile,
    job: &JobDescription,
    scorer: &dyn RelevanceScorer,
) -> Result<StructuredCv, AppError> {
    let skills = select_top(score_all(scorer, &profile.skills, job).await?, TOP_ITEMS);
    let achievements = select_top(
        score_all(scorer, &profile.achievements, job).await?,
        TOP_ITEMS,
    );

    let mut role_scores = Vec::with_capacity(profile.roles.len());
    for role in &profile.roles {
        role_scores.push(scorer.score(&role.summary(), job).await?.score);
    }
    let experience = redact_roles(&profile.roles, &role_scores, ROLE_DESCRIPTION_THRESHOLD);

    info!(
        "Selected {}/{} skills, {}/{} achievements, {} roles ({} with descriptions)",
        skills.len(),
        profile.skills.len(),
        achievements.len(),
        profile.achievements.len(),
        experience.len(),
        experience.iter().filter(|r| r.description.is_some()).count()
    );

    Ok(StructuredCv {
        personal: profile.personal.clone(),
        qualifications: profile.qualifications.clone(),
        skills: skills.into_iter().map(|s| s.text).collect(),
        achievements: achievements.into_iter().map(|s| s.text).collect(),
        experience,
    })
}

/// Sorts by score descending and keeps the first `limit`. Ties keep input order.
pub fn select_top(mut items: Vec<ScoredItem>, limit: usize) -> Vec<ScoredItem> {
    // sort_by is stable
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items.truncate(limit);
    items
}

/// Converts roles for the composer, keeping a description only when the
/// role's score is at least `threshold`. `scores[i]` belongs to `roles[i]`.
pub fn redact_roles(roles: &[PastRole], scores: &[u8], threshold: u8) -> Vec<CvRole> {
    roles
        .iter()
        .zip(scores)
        .map(|(role, &score)| CvRole {
            title: role.title.clone(),
            organisation: role.organisation.clone(),
            period: role.period(),
            description: if score < threshold {
                None
            } else {
                role.description.clone()
            },
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

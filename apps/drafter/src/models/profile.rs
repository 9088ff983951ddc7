use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

/// A previously held position. `end: None` means the role is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastRole {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PastRole {
    pub fn period(&self) -> String {
        format!("{} - {}", self.start, self.end.as_deref().unwrap_or("present"))
    }

    /// One-paragraph rendering used as the text to score against a job.
    pub fn summary(&self) -> String {
        let mut summary = self.title.clone();
        if let Some(org) = &self.organisation {
            summary.push_str(&format!(" at {org}"));
        }
        summary.push_str(&format!(" ({})", self.period()));
        if let Some(description) = &self.description {
            summary.push_str(&format!(": {description}"));
        }
        summary
    }
}

/// Everything known about the candidate. Loaded once per attempt, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub personal: PersonalDetails,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub roles: Vec<PastRole>,
}

impl CandidateProfile {
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let profile: CandidateProfile = serde_json::from_str(raw)
            .map_err(|e| AppError::Input(format!("Invalid candidate profile: {e}")))?;
        if profile.personal.name.trim().is_empty() {
            return Err(AppError::Input(
                "Candidate profile must include personal.name".to_string(),
            ));
        }
        Ok(profile)
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Input(format!(
                "Failed to read candidate profile {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }
}

//! Candidate profile data model — the structured record produced by extraction
//! and consumed by the interview and analysis pipelines.
//!
//! Wire format is camelCase JSON (the UI collaborator's native shape).
//! Sequence fields use `#[serde(default)]` so a model that omits an array
//! still yields an empty vec, never a null.

use serde::{Deserialize, Serialize};

/// Structured candidate record. Built once per uploaded document, immutable
/// afterward; a new upload supersedes the old profile wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub weaknesses: Option<Vec<String>>,
    /// The reconstructed document text. Always set once extraction succeeds.
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub year: String,
}

/// Breakdown of how many profile skills the analysis classified as
/// technical vs. soft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsCoverage {
    pub technical: u32,
    pub soft: u32,
    pub total: u32,
}

/// On-demand profile assessment. Never mutated after construction; when
/// structuring fails a labeled default instance is built instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    #[serde(default)]
    pub skills_coverage: SkillsCoverage,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl AnalysisResult {
    /// Clamps every score into [0, 100]. Models occasionally return 105 or -1.
    pub fn clamped(mut self) -> Self {
        self.overall_score = self.overall_score.clamp(0.0, 100.0);
        self.skills_score = self.skills_score.clamp(0.0, 100.0);
        self.experience_score = self.experience_score.clamp(0.0, 100.0);
        self.education_score = self.education_score.clamp(0.0, 100.0);
        self
    }

    /// Baseline result substituted when structuring fails or no provider is
    /// reachable. Clearly labeled so the UI never presents it as a real
    /// assessment; skill classification counts are unknowable without a
    /// model, so only the total is filled in.
    pub fn fallback(profile: &CandidateProfile) -> Self {
        AnalysisResult {
            overall_score: 50.0,
            skills_score: 50.0,
            experience_score: 50.0,
            education_score: 50.0,
            skills_coverage: SkillsCoverage {
                technical: 0,
                soft: 0,
                total: profile.skills.len() as u32,
            },
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recommendations: vec![
                "Automated analysis was unavailable; try again later for a detailed breakdown."
                    .to_string(),
            ],
            summary: "Baseline assessment: the analysis model could not be reached, so neutral \
                      scores are shown."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile_json() -> &'static str {
        // What a terse model actually returns: required fields only.
        r#"{
            "name": "Ada Lovelace",
            "skills": ["Rust", "Distributed Systems"],
            "experience": [],
            "education": []
        }"#
    }

    #[test]
    fn test_profile_missing_optionals_deserializes() {
        let profile: CandidateProfile = serde_json::from_str(minimal_profile_json()).unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.skills.len(), 2);
        assert!(profile.email.is_none());
        assert!(profile.weaknesses.is_none());
        assert_eq!(profile.raw_text, "");
    }

    #[test]
    fn test_profile_null_like_omissions_yield_empty_sequences() {
        // Arrays omitted entirely must come back as empty vecs, not errors.
        let json = r#"{"name": "B"}"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        assert!(profile.skills.is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.education.is_empty());
    }

    #[test]
    fn test_profile_round_trips_camel_case() {
        let json = r#"{
            "name": "C",
            "skills": [],
            "experience": [{"company": "Acme", "position": "Engineer", "duration": "2y", "description": "built things"}],
            "education": [],
            "rawText": "full text"
        }"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.raw_text, "full text");
        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["rawText"], "full text");
        assert_eq!(out["experience"][0]["company"], "Acme");
    }

    #[test]
    fn test_analysis_clamped_bounds_scores() {
        let result = AnalysisResult {
            overall_score: 105.0,
            skills_score: -3.0,
            experience_score: 70.0,
            education_score: 100.0,
            skills_coverage: SkillsCoverage::default(),
            strengths: vec![],
            weaknesses: vec![],
            recommendations: vec![],
            summary: String::new(),
        }
        .clamped();
        assert_eq!(result.overall_score, 100.0);
        assert_eq!(result.skills_score, 0.0);
        assert_eq!(result.experience_score, 70.0);
    }

    #[test]
    fn test_fallback_has_defined_scores_and_total_coverage() {
        let profile: CandidateProfile = serde_json::from_str(minimal_profile_json()).unwrap();
        let result = AnalysisResult::fallback(&profile);
        assert!(result.overall_score.is_finite());
        assert!(result.experience_score.is_finite());
        assert!(result.education_score.is_finite());
        assert_eq!(result.skills_coverage.total, 2);
        assert!(result.summary.contains("Baseline"));
    }
}

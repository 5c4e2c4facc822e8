// LLM prompt constants for profile analysis.

/// System prompt for profile analysis — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str =
    "You are an expert technical recruiter assessing a candidate profile. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Analysis prompt template. Replace `{profile_json}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Assess the candidate profile below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "overallScore": 72,
  "skillsScore": 80,
  "experienceScore": 65,
  "educationScore": 70,
  "skillsCoverage": {"technical": 8, "soft": 2, "total": 10},
  "strengths": ["Concrete strength grounded in the profile"],
  "weaknesses": ["Concrete gap grounded in the profile"],
  "recommendations": ["Actionable next step"],
  "summary": "One to two sentences summarizing the candidate."
}

Rules:
1. Every score is a number between 0 and 100.
2. `skillsCoverage` counts the profile's listed skills: `technical` + `soft` = `total`.
3. Base every strength, weakness, and recommendation on the profile content only.
4. An empty experience or education section lowers the matching score; it never removes the field.

CANDIDATE PROFILE:
{profile_json}"#;

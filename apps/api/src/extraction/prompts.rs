// LLM prompt constants for the extraction pipeline.

/// System prompt for resume structuring — enforces JSON-only output.
pub const STRUCTURING_SYSTEM: &str =
    "You are an expert resume analyst. \
    Convert raw resume text into structured candidate data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent facts that are not present in the resume text.";

/// Structuring prompt template. Replace `{resume_text}` before sending.
pub const STRUCTURING_PROMPT_TEMPLATE: &str = r#"Extract structured candidate information from the resume text below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Full Name",
  "email": "person@example.com or null",
  "phone": "+1 555 000 0000 or null",
  "summary": "One-paragraph professional summary, or null",
  "skills": ["Rust", "PostgreSQL"],
  "experience": [
    {
      "company": "Acme Corp",
      "position": "Senior Engineer",
      "duration": "2019-2023",
      "description": "What they did there, one or two sentences",
      "technologies": ["Rust", "Kafka"]
    }
  ],
  "education": [
    {
      "institution": "MIT",
      "degree": "BSc",
      "field": "Computer Science",
      "year": "2018"
    }
  ],
  "weaknesses": ["Areas the resume suggests are underdeveloped"]
}

Rules:
1. `name`, `skills`, `experience`, `education` are REQUIRED. Use empty arrays when a section is absent — never omit them.
2. Copy skill names verbatim from the resume; do not normalize or expand them.
3. Keep each experience description factual and grounded in the text.
4. `weaknesses` is optional: include it only when the resume itself implies gaps (e.g. no testing experience listed).

RESUME TEXT:
{resume_text}"#;

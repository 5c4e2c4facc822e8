//! Interviewer persona construction. `build_system_prompt` is pure: the
//! same profile and difficulty always produce the same string.

use serde::{Deserialize, Serialize};

use crate::models::profile::CandidateProfile;

pub mod handlers;
pub mod prompts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Junior,
    #[default]
    Middle,
    Senior,
}

struct DifficultyBlock {
    label: &'static str,
    focus: &'static str,
    categories: &'static [&'static str],
    complexity: &'static str,
}

fn difficulty_block(difficulty: Difficulty) -> DifficultyBlock {
    match difficulty {
        Difficulty::Junior => DifficultyBlock {
            label: "junior",
            focus: "fundamentals and core concepts the candidate claims on their resume",
            categories: &[
                "definitions and core concepts",
                "simple debugging scenarios",
                "language and tooling basics",
                "walking through a past project step by step",
            ],
            complexity: "Keep each question to a single concept; avoid multi-part or \
                         architecture-scale questions.",
        },
        Difficulty::Middle => DifficultyBlock {
            label: "middle",
            focus: "applied engineering judgment in situations the candidate has actually faced",
            categories: &[
                "design trade-offs in familiar systems",
                "debugging under constraints",
                "testing and reliability practices",
                "refactoring decisions from past work",
            ],
            complexity: "Questions may combine two related concepts; probe for reasoning about \
                         trade-offs rather than recall.",
        },
        Difficulty::Senior => DifficultyBlock {
            label: "senior",
            focus: "architecture, scale, and technical leadership",
            categories: &[
                "system design and scalability",
                "failure modes and incident response",
                "cross-team technical decisions",
                "mentoring and code-quality standards",
            ],
            complexity: "Pose open-ended, multi-constraint problems and press for justification \
                         of every choice.",
        },
    }
}

/// Builds the interviewer system prompt: persona header, the candidate's
/// profile embedded verbatim (every skill, one line per experience and
/// education entry), the difficulty-specific block, and the unconditional
/// behavioral rules.
pub fn build_system_prompt(profile: &CandidateProfile, difficulty: Difficulty) -> String {
    let block = difficulty_block(difficulty);
    let mut prompt = prompts::PERSONA_HEADER.replace("{name}", &profile.name);

    if let Some(summary) = &profile.summary {
        prompt.push_str(&format!("\nCANDIDATE SUMMARY:\n{summary}\n"));
    }

    prompt.push_str("\nCANDIDATE SKILLS:\n");
    for skill in &profile.skills {
        prompt.push_str(&format!("- {skill}\n"));
    }

    if !profile.experience.is_empty() {
        prompt.push_str("\nEXPERIENCE:\n");
        for entry in &profile.experience {
            prompt.push_str(&format!(
                "- {} at {} ({}): {}\n",
                entry.position, entry.company, entry.duration, entry.description
            ));
        }
    }

    if !profile.education.is_empty() {
        prompt.push_str("\nEDUCATION:\n");
        for entry in &profile.education {
            prompt.push_str(&format!(
                "- {} in {}, {} ({})\n",
                entry.degree, entry.field, entry.institution, entry.year
            ));
        }
    }

    if let Some(weaknesses) = &profile.weaknesses {
        if !weaknesses.is_empty() {
            prompt.push_str("\nAREAS TO PROBE GENTLY:\n");
            for weakness in weaknesses {
                prompt.push_str(&format!("- {weakness}\n"));
            }
        }
    }

    prompt.push_str(&format!(
        "\nINTERVIEW LEVEL: {}\nFocus: {}.\nPermitted question categories:\n",
        block.label, block.focus
    ));
    for category in block.categories {
        prompt.push_str(&format!("- {category}\n"));
    }
    prompt.push_str(&format!("Complexity directive: {}\n", block.complexity));

    prompt.push_str(prompts::BEHAVIORAL_RULES);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{EducationEntry, ExperienceEntry};

    fn profile() -> CandidateProfile {
        CandidateProfile {
            name: "Ada Lovelace".into(),
            email: None,
            phone: None,
            summary: Some("Engineer working on compilers".into()),
            skills: vec!["Rust".into(), "LLVM / codegen".into(), "C++17".into()],
            experience: vec![ExperienceEntry {
                company: "Analytical Engines".into(),
                position: "Senior Engineer".into(),
                duration: "2015-2023".into(),
                description: "Led the backend rewrite".into(),
                technologies: None,
            }],
            education: vec![EducationEntry {
                institution: "University of London".into(),
                degree: "MSc".into(),
                field: "Mathematics".into(),
                year: "1840".into(),
            }],
            weaknesses: None,
            raw_text: "raw".into(),
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let p = profile();
        assert_eq!(
            build_system_prompt(&p, Difficulty::Middle),
            build_system_prompt(&p, Difficulty::Middle)
        );
    }

    #[test]
    fn test_prompt_embeds_every_skill_verbatim() {
        let p = profile();
        let prompt = build_system_prompt(&p, Difficulty::Junior);
        for skill in &p.skills {
            assert!(prompt.contains(skill.as_str()), "missing skill: {skill}");
        }
    }

    #[test]
    fn test_prompt_has_one_line_per_experience_and_education_entry() {
        let prompt = build_system_prompt(&profile(), Difficulty::Senior);
        assert!(prompt.contains("Senior Engineer at Analytical Engines (2015-2023)"));
        assert!(prompt.contains("MSc in Mathematics, University of London (1840)"));
    }

    #[test]
    fn test_category_block_differs_across_difficulties() {
        let p = profile();
        let junior = build_system_prompt(&p, Difficulty::Junior);
        let middle = build_system_prompt(&p, Difficulty::Middle);
        let senior = build_system_prompt(&p, Difficulty::Senior);
        assert_ne!(junior, middle);
        assert_ne!(middle, senior);
        assert!(junior.contains("definitions and core concepts"));
        assert!(middle.contains("design trade-offs"));
        assert!(senior.contains("system design and scalability"));
    }

    #[test]
    fn test_behavioral_rules_are_unconditional() {
        let p = profile();
        for difficulty in [Difficulty::Junior, Difficulty::Middle, Difficulty::Senior] {
            let prompt = build_system_prompt(&p, difficulty);
            assert!(prompt.contains("exactly ONE question per turn"));
            assert!(prompt.contains("NEVER supply the answer"));
            assert!(prompt.contains("NEVER break persona"));
        }
    }

    #[test]
    fn test_difficulty_deserializes_lowercase_with_middle_default() {
        let d: Difficulty = serde_json::from_str(r#""senior""#).unwrap();
        assert_eq!(d, Difficulty::Senior);
        assert_eq!(Difficulty::default(), Difficulty::Middle);
    }
}

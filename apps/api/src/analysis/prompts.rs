// Resume analysis prompt templates.

use crate::llm_client::prompts::JSON_ONLY_PREAMBLE;

pub const RESUME_ANALYSIS_PROMPT: &str = r#"{preamble}
Analyze this resume and return a JSON object with exactly this structure:
{
    "Primary job role": "string" (don't add words like student or studying),
    "Key skills": ["string"],
    "Years of experience": "string",
    "Key achievements": ["string"],
    "Preferred job titles": ["string"]
}

Resume text:
{resume_text}
"#;

/// Fills the analysis template with the extracted resume text.
pub fn build_resume_analysis_prompt(resume_text: &str) -> String {
    RESUME_ANALYSIS_PROMPT
        .replace("{preamble}", JSON_ONLY_PREAMBLE)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_resume_text() {
        let prompt = build_resume_analysis_prompt("JOHN DOE\nRust engineer");
        assert!(prompt.contains("Resume text:\nJOHN DOE\nRust engineer"));
    }

    #[test]
    fn test_prompt_names_all_five_fields() {
        let prompt = build_resume_analysis_prompt("");
        for key in [
            "\"Primary job role\"",
            "\"Key skills\"",
            "\"Years of experience\"",
            "\"Key achievements\"",
            "\"Preferred job titles\"",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_prompt_starts_with_json_only_instruction() {
        let prompt = build_resume_analysis_prompt("x");
        assert!(prompt.starts_with(JSON_ONLY_PREAMBLE));
        assert!(!prompt.contains("{preamble}"));
    }
}

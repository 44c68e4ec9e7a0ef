//! Resume Analyzer: asks the LLM for a fixed five-field summary of a resume.
//!
//! The analyzer never fails: a generation error or an unparseable reply yields
//! an empty `ResumeAnalysis` plus a notice for the user.

pub mod prompts;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::prompts::build_resume_analysis_prompt;
use crate::llm_client::{strip_json_fences, TextGenerator};

/// Structured resume summary. Field names match the JSON keys the model is told to use.
///
/// Decoding is lenient the way a dictionary lookup would be: a missing or null
/// key reads as empty, and scalars are taken as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(rename = "Primary job role", default, deserialize_with = "lenient_text")]
    pub primary_role: String,
    #[serde(rename = "Key skills", default, deserialize_with = "lenient_list")]
    pub key_skills: Vec<String>,
    #[serde(rename = "Years of experience", default, deserialize_with = "lenient_text")]
    pub years_of_experience: String,
    #[serde(rename = "Key achievements", default, deserialize_with = "lenient_list")]
    pub key_achievements: Vec<String>,
    #[serde(rename = "Preferred job titles", default, deserialize_with = "lenient_list")]
    pub preferred_titles: Vec<String>,
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A lone value becomes a one-item list; nulls and blank entries are dropped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items
        .into_iter()
        .filter_map(value_text)
        .filter(|item| !item.trim().is_empty())
        .collect())
}

impl ResumeAnalysis {
    /// True for the "empty mapping" returned when analysis fails.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The role used as the job-search query, if the model produced one.
    pub fn search_role(&self) -> Option<&str> {
        let role = self.primary_role.trim();
        (!role.is_empty()).then_some(role)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: ResumeAnalysis,
    /// User-visible message when the analysis had to be masked.
    pub notice: Option<String>,
}

/// Parses a raw model reply into a `ResumeAnalysis`, stripping code fences first.
pub fn parse_analysis_reply(reply: &str) -> Result<ResumeAnalysis, serde_json::Error> {
    let cleaned = strip_json_fences(reply);
    debug!("Cleaned analysis response: {cleaned}");
    serde_json::from_str(cleaned)
}

/// Runs one analysis call. Errors are logged and masked with an empty record.
pub async fn analyze_resume(resume_text: &str, llm: &dyn TextGenerator) -> AnalysisOutcome {
    let prompt = build_resume_analysis_prompt(resume_text);

    let reply = match llm.generate(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Resume analysis call failed: {e}");
            return AnalysisOutcome {
                analysis: ResumeAnalysis::default(),
                notice: Some(format!("Error calling Gemini API: {e}")),
            };
        }
    };

    match parse_analysis_reply(&reply) {
        Ok(analysis) => AnalysisOutcome {
            analysis,
            notice: None,
        },
        Err(e) => {
            warn!("Resume analysis reply was not valid JSON: {e}");
            AnalysisOutcome {
                analysis: ResumeAnalysis::default(),
                notice: Some(format!("Error parsing JSON response: {e}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a canned string and remembers the last prompt.
    struct CannedGenerator {
        reply: Result<String, u16>,
        last_prompt: Mutex<Option<String>>,
    }

    impl CannedGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "API Error".to_string(),
                }),
            }
        }
    }

    fn sample() -> ResumeAnalysis {
        ResumeAnalysis {
            primary_role: "Data Scientist".to_string(),
            key_skills: vec!["Python".into(), "SQL".into(), "TensorFlow".into()],
            years_of_experience: "3 years".to_string(),
            key_achievements: vec!["Built ML model".into()],
            preferred_titles: vec!["ML Engineer".into()],
        }
    }

    #[tokio::test]
    async fn test_analyze_resume_valid_reply() {
        let reply = r#"{
            "Primary job role": "Software Engineer",
            "Key skills": ["Python", "JavaScript", "React"],
            "Years of experience": "5 years",
            "Key achievements": ["Led team of 5", "Shipped product"],
            "Preferred job titles": ["Senior Developer", "Tech Lead"]
        }"#;
        let llm = CannedGenerator::replying(reply);
        let outcome = analyze_resume("Sample resume text", &llm).await;

        assert!(outcome.notice.is_none());
        assert_eq!(outcome.analysis.primary_role, "Software Engineer");
        assert!(outcome.analysis.key_skills.contains(&"Python".to_string()));
        assert_eq!(outcome.analysis.key_achievements.len(), 2);

        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Sample resume text"));
    }

    #[tokio::test]
    async fn test_analyze_resume_fenced_reply_round_trips() {
        let record = sample();
        let reply = format!("```json\n{}\n```", serde_json::to_string(&record).unwrap());
        let outcome = analyze_resume("Sample resume", &CannedGenerator::replying(&reply)).await;
        assert_eq!(outcome.analysis, record);
        assert!(outcome.notice.is_none());
    }

    #[tokio::test]
    async fn test_analyze_resume_bare_fenced_reply() {
        let record = sample();
        let reply = format!("```\n{}\n```", serde_json::to_string_pretty(&record).unwrap());
        let outcome = analyze_resume("Sample resume", &CannedGenerator::replying(&reply)).await;
        assert_eq!(outcome.analysis, record);
    }

    #[tokio::test]
    async fn test_analyze_resume_invalid_json_yields_empty() {
        let llm = CannedGenerator::replying("This is not valid JSON");
        let outcome = analyze_resume("Sample resume", &llm).await;
        assert!(outcome.analysis.is_empty());
        assert!(outcome
            .notice
            .unwrap()
            .starts_with("Error parsing JSON response"));
    }

    #[tokio::test]
    async fn test_analyze_resume_api_error_yields_empty() {
        let outcome = analyze_resume("Sample resume", &CannedGenerator::failing(500)).await;
        assert!(outcome.analysis.is_empty());
        assert!(outcome.notice.unwrap().starts_with("Error calling Gemini API"));
    }

    #[tokio::test]
    async fn test_analyze_resume_empty_fields() {
        let reply = r#"{
            "Primary job role": "",
            "Key skills": [],
            "Years of experience": "",
            "Key achievements": [],
            "Preferred job titles": []
        }"#;
        let outcome = analyze_resume("", &CannedGenerator::replying(reply)).await;
        assert!(outcome.notice.is_none());
        assert!(outcome.analysis.key_skills.is_empty());
        assert!(outcome.analysis.search_role().is_none());
    }

    #[test]
    fn test_missing_keys_default() {
        let parsed = parse_analysis_reply(r#"{"Primary job role": "Chef"}"#).unwrap();
        assert_eq!(parsed.primary_role, "Chef");
        assert!(parsed.key_skills.is_empty());
        assert!(parsed.years_of_experience.is_empty());
    }

    #[test]
    fn test_null_and_scalar_values_are_tolerated() {
        let parsed = parse_analysis_reply(
            r#"{
                "Primary job role": "Nurse",
                "Key skills": null,
                "Years of experience": 5,
                "Key achievements": "Charge nurse of the year",
                "Preferred job titles": ["ICU Nurse", null, "", 3]
            }"#,
        )
        .unwrap();
        assert!(parsed.key_skills.is_empty());
        assert_eq!(parsed.years_of_experience, "5");
        assert_eq!(parsed.key_achievements, vec!["Charge nurse of the year"]);
        assert_eq!(parsed.preferred_titles, vec!["ICU Nurse", "3"]);
    }

    #[tokio::test]
    async fn test_analyze_resume_accepts_numeric_experience() {
        let reply = r#"{"Primary job role": "Chef", "Years of experience": 12.5, "Key skills": null}"#;
        let outcome = analyze_resume("Sample resume", &CannedGenerator::replying(reply)).await;
        assert!(outcome.notice.is_none());
        assert_eq!(outcome.analysis.search_role(), Some("Chef"));
        assert_eq!(outcome.analysis.years_of_experience, "12.5");
    }

    #[test]
    fn test_search_role_is_trimmed() {
        let analysis = ResumeAnalysis {
            primary_role: "  Backend Engineer ".to_string(),
            ..Default::default()
        };
        assert_eq!(analysis.search_role(), Some("Backend Engineer"));
    }

    #[test]
    fn test_serializes_with_upstream_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["Primary job role"], "Data Scientist");
        assert_eq!(value["Preferred job titles"][0], "ML Engineer");
    }
}

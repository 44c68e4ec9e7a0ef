use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One job posting as returned by JSearch.
///
/// The record is owned by the upstream API and is kept exactly as received,
/// nulls and number formatting included. Fields the UI needs are read through
/// accessors that treat a missing, null or mistyped value as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobListing(Map<String, Value>);

impl JobListing {
    pub fn title(&self) -> &str {
        self.text("job_title").unwrap_or_default()
    }

    pub fn employer(&self) -> &str {
        self.text("employer_name").unwrap_or_default()
    }

    pub fn city(&self) -> Option<&str> {
        self.text("job_city")
    }

    pub fn country(&self) -> Option<&str> {
        self.text("job_country")
    }

    pub fn employment_type(&self) -> Option<&str> {
        self.text("job_employment_type")
    }

    pub fn min_salary(&self) -> Option<f64> {
        self.number("job_min_salary")
    }

    pub fn max_salary(&self) -> Option<f64> {
        self.number("job_max_salary")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("job_description")
    }

    pub fn apply_link(&self) -> Option<&str> {
        self.text("job_apply_link")
    }

    pub fn posted_at(&self) -> Option<&str> {
        self.text("job_posted_at_datetime_utc")
    }

    /// String entries of one `job_highlights` section, e.g. "Qualifications".
    pub fn highlights(&self, section: &str) -> Vec<&str> {
        self.0
            .get("job_highlights")
            .and_then(|h| h.get(section))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    /// Salaries arrive as integers, floats, or occasionally numeric strings.
    fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for JobListing {
    fn from(record: Map<String, Value>) -> Self {
        Self(record)
    }
}

/// Top-level JSearch payload. `data` is empty on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "listings_or_empty")]
    pub data: Vec<JobListing>,
}

/// `data: null` means no listings. Entries that are not objects are skipped.
fn listings_or_empty<'de, D>(deserializer: D) -> Result<Vec<JobListing>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(JobListing::from(record)),
            _ => None,
        })
        .collect())
}

/// JSearch `date_posted` values. `All` sends no parameter at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePosted {
    #[default]
    All,
    Today,
    #[serde(rename = "3days")]
    ThreeDays,
    Week,
    Month,
}

impl DatePosted {
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            DatePosted::All => None,
            DatePosted::Today => Some("today"),
            DatePosted::ThreeDays => Some("3days"),
            DatePosted::Week => Some("week"),
            DatePosted::Month => Some("month"),
        }
    }
}

/// Everything needed for one search request.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub role: String,
    pub location: Option<String>,
    pub page: u32,
    pub date_posted: DatePosted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(raw: Value) -> JobListing {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_accessors_read_documented_fields() {
        let listing = listing(json!({
            "job_id": "12345",
            "job_title": "Senior Python Developer",
            "employer_name": "Tech Corp",
            "job_city": "San Francisco",
            "job_country": "USA",
            "job_employment_type": "FULLTIME",
            "job_min_salary": 120000,
            "job_max_salary": 180000.5,
            "job_highlights": {"Qualifications": ["5+ years of Python"], "Benefits": ["Remote"]},
            "job_apply_link": "https://example.com/apply",
            "job_posted_at_datetime_utc": "2024-01-20T10:00:00Z"
        }));

        assert_eq!(listing.title(), "Senior Python Developer");
        assert_eq!(listing.employer(), "Tech Corp");
        assert_eq!(listing.employment_type(), Some("FULLTIME"));
        assert_eq!(listing.min_salary(), Some(120000.0));
        assert_eq!(listing.max_salary(), Some(180000.5));
        assert_eq!(listing.highlights("Qualifications"), vec!["5+ years of Python"]);
        assert!(listing.highlights("Responsibilities").is_empty());
        assert_eq!(listing.posted_at(), Some("2024-01-20T10:00:00Z"));
    }

    #[test]
    fn test_record_round_trips_unchanged() {
        let raw = json!({
            "job_title": "Analyst",
            "employer_name": "Acme",
            "employer_logo": "https://example.com/logo.png",
            "job_is_remote": true,
            "job_city": null,
            "job_min_salary": 120000,
            "job_max_salary": null,
            "job_highlights": null
        });
        let listing = listing(raw.clone());
        assert_eq!(serde_json::to_value(&listing).unwrap(), raw);
        assert_eq!(listing.as_map()["job_is_remote"], json!(true));
    }

    #[test]
    fn test_null_and_mistyped_fields_read_as_absent() {
        let listing = listing(json!({
            "job_title": null,
            "employer_name": null,
            "job_city": 42,
            "job_min_salary": "95000",
            "job_max_salary": {"amount": 1},
            "job_highlights": {"Benefits": ["Dental", null, 3]}
        }));
        assert_eq!(listing.title(), "");
        assert_eq!(listing.employer(), "");
        assert!(listing.city().is_none());
        assert_eq!(listing.min_salary(), Some(95000.0));
        assert!(listing.max_salary().is_none());
        assert_eq!(listing.highlights("Benefits"), vec!["Dental"]);
    }

    #[test]
    fn test_response_with_null_fields_still_decodes() {
        let response: JobSearchResponse = serde_json::from_value(json!({
            "status": "OK",
            "request_id": null,
            "data": [
                {"job_title": "A", "employer_name": "B"},
                {"job_title": "C", "employer_name": null}
            ]
        }))
        .unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[1].title(), "C");
        assert_eq!(response.data[1].employer(), "");
    }

    #[test]
    fn test_response_without_data_is_empty() {
        let response: JobSearchResponse =
            serde_json::from_value(json!({"status": "OK"})).unwrap();
        assert!(response.data.is_empty());

        let response: JobSearchResponse =
            serde_json::from_value(json!({"status": "OK", "data": null})).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_date_posted_params() {
        assert_eq!(DatePosted::All.as_param(), None);
        assert_eq!(DatePosted::ThreeDays.as_param(), Some("3days"));
        let parsed: DatePosted = serde_json::from_str("\"3days\"").unwrap();
        assert_eq!(parsed, DatePosted::ThreeDays);
    }
}

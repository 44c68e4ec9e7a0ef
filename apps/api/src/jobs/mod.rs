//! Job Search Client: queries RapidAPI JSearch for postings matching a role.

pub mod models;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

pub use models::{DatePosted, JobListing, JobQuery, JobSearchResponse};

const JSEARCH_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
pub const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Carried in `AppState` as `Arc<dyn JobSearch>`.
#[async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, query: &JobQuery) -> Result<JobSearchResponse, JobSearchError>;
}

/// "<role> in <location>" when a location is given, otherwise the bare role.
pub fn build_query(role: &str, location: Option<&str>) -> String {
    match location.map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => format!("{role} in {location}"),
        None => role.to_string(),
    }
}

/// Query-string parameters for one JSearch request.
pub fn query_params(query: &JobQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", build_query(&query.role, query.location.as_deref())),
        ("page", query.page.to_string()),
        ("num_pages", "1".to_string()),
    ];
    if let Some(date_posted) = query.date_posted.as_param() {
        params.push(("date_posted", date_posted.to_string()));
    }
    params
}

#[derive(Clone)]
pub struct JSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl JSearchClient {
    pub fn new(api_key: String) -> Result<Self, JobSearchError> {
        Self::with_base_url(api_key, JSEARCH_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, JobSearchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl JobSearch for JSearchClient {
    async fn search(&self, query: &JobQuery) -> Result<JobSearchResponse, JobSearchError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let params = query_params(query);
        debug!("JSearch request: {:?}", params);

        let response = self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Result of a search that never fails.
///
/// `response` is the upstream payload, or an empty payload when the request
/// failed; `error` says which of the two happened.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub response: JobSearchResponse,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Issues one search; any failure is logged and replaced by `{"data": []}`.
pub async fn fetch_jobs(search: &dyn JobSearch, query: &JobQuery) -> FetchOutcome {
    match search.search(query).await {
        Ok(response) => FetchOutcome {
            response,
            error: None,
        },
        Err(e) => {
            warn!("Job search failed for '{}' page {}: {e}", query.role, query.page);
            FetchOutcome {
                response: JobSearchResponse::default(),
                error: Some(format!("Error fetching jobs: {e}")),
            }
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::jobs::{DatePosted, JobListing};

/// Employment-type choices offered in the UI. Values match JSearch's
/// `job_employment_type` strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentFilter {
    #[default]
    All,
    #[serde(rename = "FULLTIME")]
    FullTime,
    #[serde(rename = "PARTTIME")]
    PartTime,
    #[serde(rename = "CONTRACTOR")]
    Contractor,
    #[serde(rename = "INTERN")]
    Intern,
}

impl EmploymentFilter {
    pub fn upstream_value(self) -> Option<&'static str> {
        match self {
            EmploymentFilter::All => None,
            EmploymentFilter::FullTime => Some("FULLTIME"),
            EmploymentFilter::PartTime => Some("PARTTIME"),
            EmploymentFilter::Contractor => Some("CONTRACTOR"),
            EmploymentFilter::Intern => Some("INTERN"),
        }
    }

    /// Exact match against the listing's employment type after upper-casing it.
    pub fn matches(self, listing: &JobListing) -> bool {
        match self.upstream_value() {
            None => true,
            Some(wanted) => {
                listing
                    .employment_type()
                    .unwrap_or_default()
                    .to_uppercase()
                    == wanted
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub employment_type: EmploymentFilter,
    #[serde(default)]
    pub date_posted: DatePosted,
}

/// Keeps only the listings the employment filter accepts. Never backfills.
pub fn filter_listings(listings: Vec<JobListing>, filter: EmploymentFilter) -> Vec<JobListing> {
    listings.into_iter().filter(|l| filter.matches(l)).collect()
}

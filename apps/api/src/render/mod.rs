//! Server-side HTML fragments for the resume summary and job cards.
//!
//! Markup lives in askama templates under `templates/`; the `.html` extension
//! turns on auto-escaping for every value taken from the resume, the LLM, or
//! JSearch. This module only prepares display-ready values.

use askama::Template;
use chrono::NaiveDate;

use crate::analysis::ResumeAnalysis;
use crate::jobs::JobListing;
use crate::session::{Notice, NoticeLevel, SessionContext, ViewState};

/// The single-page UI served at `/`.
pub const INDEX_HTML: &str = include_str!("../../assets/index.html");

impl NoticeLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Warning => "notice-warning",
            NoticeLevel::Error => "notice-error",
        }
    }
}

/// 120000.0 -> "120,000"; 45.5 -> "45.50"
pub fn format_amount(amount: f64) -> String {
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let digits = (total_cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if amount < 0.0 {
        grouped.push('-');
    }
    for (i, d) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(d);
    }
    let cents = total_cents % 100;
    if cents > 0 {
        grouped.push_str(&format!(".{cents:02}"));
    }
    grouped
}

/// "$min - $max", only when both bounds are present and non-zero.
pub fn salary_range(listing: &JobListing) -> Option<String> {
    match (listing.min_salary(), listing.max_salary()) {
        (Some(min), Some(max)) if min != 0.0 && max != 0.0 => Some(format!(
            "${} - ${}",
            format_amount(min),
            format_amount(max)
        )),
        _ => None,
    }
}

/// "City, Country" with dangling separators removed; `None` when both are blank.
pub fn location_line(listing: &JobListing) -> Option<String> {
    let raw = format!(
        "{}, {}",
        listing.city().unwrap_or_default(),
        listing.country().unwrap_or_default()
    );
    let trimmed = raw.trim_matches(|c: char| c == ',' || c == ' ');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// "Today", "Yesterday" or "N days ago" from an ISO timestamp's date part.
/// A date after `today` (clock skew between us and JSearch) reads as "Today".
pub fn posted_age(posted_at: &str, today: NaiveDate) -> Option<String> {
    let date = NaiveDate::parse_from_str(posted_at.get(..10)?, "%Y-%m-%d").ok()?;
    let days = (today - date).num_days();
    Some(match days {
        n if n <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        n => format!("{n} days ago"),
    })
}

/// Display-ready view of one listing.
pub struct JobCard<'a> {
    pub title: &'a str,
    pub employer: &'a str,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub employment_type: Option<&'a str>,
    pub posted: Option<String>,
    pub description: &'a str,
    pub qualifications: Vec<&'a str>,
    pub benefits: Vec<&'a str>,
    pub apply_link: Option<&'a str>,
}

impl<'a> JobCard<'a> {
    pub fn new(job: &'a JobListing, today: NaiveDate) -> Self {
        Self {
            title: job.title(),
            employer: job.employer(),
            location: location_line(job),
            salary: salary_range(job),
            employment_type: job.employment_type().filter(|k| !k.is_empty()),
            posted: job.posted_at().and_then(|p| posted_age(p, today)),
            description: job.description().unwrap_or("No description available"),
            qualifications: job.highlights("Qualifications"),
            benefits: job.highlights("Benefits"),
            apply_link: job.apply_link().filter(|l| !l.is_empty()),
        }
    }
}

#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate<'a> {
    notice: &'a Notice,
}

#[derive(Template)]
#[template(path = "analysis.html")]
struct AnalysisTemplate<'a> {
    analysis: &'a ResumeAnalysis,
}

#[derive(Template)]
#[template(path = "job_card.html")]
struct JobCardTemplate<'a> {
    job: JobCard<'a>,
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    status: Option<&'a Notice>,
    cards: Vec<JobCard<'a>>,
    page: u32,
}

pub fn render_notice(notice: &Notice) -> askama::Result<String> {
    NoticeTemplate { notice }.render()
}

pub fn render_analysis(analysis: &ResumeAnalysis) -> askama::Result<String> {
    AnalysisTemplate { analysis }.render()
}

pub fn render_job_card(job: &JobListing, today: NaiveDate) -> askama::Result<String> {
    JobCardTemplate {
        job: JobCard::new(job, today),
    }
    .render()
}

/// Notice, job cards and the pager for the session's current results.
pub fn render_results(ctx: &SessionContext, today: NaiveDate) -> askama::Result<String> {
    let cards = match ctx.view {
        ViewState::ResultsShown => ctx.jobs.iter().map(|job| JobCard::new(job, today)).collect(),
        ViewState::NoResults => Vec::new(),
    };
    ResultsTemplate {
        status: ctx.notice.as_ref(),
        cards,
        page: ctx.page,
    }
    .render()
}

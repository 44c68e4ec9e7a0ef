//! Per-session UI state and the pure transitions that drive pagination.
//!
//! Handlers load a `SessionContext` from the `SessionStore`, run transitions
//! on it, and write the returned context back. No transition touches the
//! network; searches happen between `begin_search`/`navigate` and
//! `apply_page_results`.

pub mod filters;
pub mod handlers;
pub mod store;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{AnalysisOutcome, ResumeAnalysis};
use crate::jobs::{FetchOutcome, JobListing, JobQuery};

pub use filters::{filter_listings, EmploymentFilter, SearchFilters};
pub use store::{SessionGuard, SessionStore};

/// Pages the "Last" button jumps ahead. Not checked against the upstream total.
pub const LAST_PAGE_STRIDE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
    /// Fetch the following page and append it instead of replacing.
    LoadMore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    NoResults,
    ResultsShown,
}

/// How a fetched page is merged into the session's job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: Uuid,
    pub resume_analysis: Option<ResumeAnalysis>,
    pub resume_chars: usize,
    pub location: Option<String>,
    pub page: u32,
    pub filters: SearchFilters,
    pub jobs: Vec<JobListing>,
    pub view: ViewState,
    pub notice: Option<Notice>,
}

impl SessionContext {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            resume_analysis: None,
            resume_chars: 0,
            location: None,
            page: 1,
            filters: SearchFilters::default(),
            jobs: Vec::new(),
            view: ViewState::NoResults,
            notice: None,
        }
    }

    /// An empty analysis is treated as missing so the next upload retries it.
    pub fn needs_analysis(&self) -> bool {
        self.resume_analysis
            .as_ref()
            .map_or(true, ResumeAnalysis::is_empty)
    }

    pub fn search_role(&self) -> Option<&str> {
        self.resume_analysis.as_ref()?.search_role()
    }

    /// The query for the current page, if the session has a role to search for.
    pub fn job_query(&self) -> Option<JobQuery> {
        Some(JobQuery {
            role: self.search_role()?.to_string(),
            location: self.location.clone(),
            page: self.page,
            date_posted: self.filters.date_posted,
        })
    }
}

/// Records a fresh upload. Only a missing or empty analysis is replaced.
pub fn record_upload(
    mut ctx: SessionContext,
    resume_chars: usize,
    location: Option<String>,
    outcome: Option<AnalysisOutcome>,
) -> SessionContext {
    ctx.resume_chars = resume_chars;
    ctx.location = normalize_location(location);
    ctx.notice = None;
    if let Some(outcome) = outcome {
        ctx.notice = outcome
            .notice
            .map(|message| Notice::new(NoticeLevel::Error, message));
        ctx.resume_analysis = Some(outcome.analysis);
    }
    ctx
}

/// Starts a new search: back to page 1 with nothing accumulated.
pub fn begin_search(
    mut ctx: SessionContext,
    filters: SearchFilters,
    location: Option<String>,
) -> SessionContext {
    ctx.filters = filters;
    if location.is_some() {
        ctx.location = normalize_location(location);
    }
    ctx.page = 1;
    ctx.jobs.clear();
    ctx.view = ViewState::NoResults;
    ctx.notice = None;
    ctx
}

/// Moves the page counter. Returns how the next page should be merged.
pub fn navigate(mut ctx: SessionContext, action: NavAction) -> (SessionContext, MergeMode) {
    let mode = match action {
        NavAction::First => {
            ctx.page = 1;
            MergeMode::Replace
        }
        NavAction::Previous => {
            ctx.page = ctx.page.saturating_sub(1).max(1);
            MergeMode::Replace
        }
        NavAction::Next => {
            ctx.page = ctx.page.saturating_add(1);
            MergeMode::Replace
        }
        NavAction::Last => {
            ctx.page = ctx.page.saturating_add(LAST_PAGE_STRIDE);
            MergeMode::Replace
        }
        NavAction::LoadMore => {
            ctx.page = ctx.page.saturating_add(1);
            MergeMode::Append
        }
    };
    (ctx, mode)
}

/// Applies one fetched page: filter, merge, and pick the notice to show.
pub fn apply_page_results(
    mut ctx: SessionContext,
    outcome: FetchOutcome,
    mode: MergeMode,
) -> SessionContext {
    if let Some(error) = outcome.error {
        if mode == MergeMode::Replace {
            ctx.jobs.clear();
        }
        ctx.view = view_for(&ctx.jobs);
        ctx.notice = Some(Notice::new(
            NoticeLevel::Error,
            format!("Unable to find jobs. Please try again later. ({error})"),
        ));
        return ctx;
    }

    let page_jobs = filter_listings(outcome.response.data, ctx.filters.employment_type);
    let found_on_page = page_jobs.len();

    match mode {
        MergeMode::Replace => ctx.jobs = page_jobs,
        MergeMode::Append => ctx.jobs.extend(page_jobs),
    }
    ctx.view = view_for(&ctx.jobs);
    ctx.notice = Some(if found_on_page > 0 {
        Notice::new(
            NoticeLevel::Success,
            format!("Found {found_on_page} matching jobs"),
        )
    } else {
        Notice::new(NoticeLevel::Warning, "No jobs found matching your filters.")
    });
    ctx
}

fn view_for(jobs: &[JobListing]) -> ViewState {
    if jobs.is_empty() {
        ViewState::NoResults
    } else {
        ViewState::ResultsShown
    }
}

fn normalize_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

//! Axum route handlers for the session API.
//!
//! Every handler follows the same shape: check the session out, run the pure
//! transitions plus whatever upstream call the action needs, write the
//! returned context back through the guard, and answer with a view of it.
//! The guard is held for the whole request, so two requests for the same
//! session run one after the other.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::{analyze_resume, ResumeAnalysis};
use crate::errors::AppError;
use crate::extraction::extract_text_from_upload;
use crate::jobs::{fetch_jobs, JobListing};
use crate::render::{render_analysis, render_notice, render_results};
use crate::session::{
    apply_page_results, begin_search, navigate, record_upload, MergeMode, NavAction, Notice,
    SearchFilters, SessionContext, SessionGuard, ViewState,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub action: NavAction,
}

#[derive(Debug, Serialize)]
pub struct AnalysisView {
    pub session_id: Uuid,
    /// `None` when the analysis came back empty.
    pub analysis: Option<ResumeAnalysis>,
    pub resume_chars: usize,
    pub notice: Option<Notice>,
    pub html: String,
}

impl AnalysisView {
    fn from_context(ctx: &SessionContext) -> Result<Self, AppError> {
        let analysis = ctx
            .resume_analysis
            .clone()
            .filter(|a| !a.is_empty());
        let mut html = String::new();
        if let Some(notice) = &ctx.notice {
            html.push_str(&render_notice(notice)?);
        }
        if let Some(analysis) = &analysis {
            html.push_str(&render_analysis(analysis)?);
        }
        Ok(Self {
            session_id: ctx.id,
            analysis,
            resume_chars: ctx.resume_chars,
            notice: ctx.notice.clone(),
            html,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsView {
    pub session_id: Uuid,
    pub page: u32,
    pub filters: SearchFilters,
    pub view: ViewState,
    pub jobs: Vec<JobListing>,
    pub notice: Option<Notice>,
    pub html: String,
}

impl ResultsView {
    fn from_context(ctx: &SessionContext) -> Result<Self, AppError> {
        Ok(Self {
            session_id: ctx.id,
            page: ctx.page,
            filters: ctx.filters,
            view: ctx.view,
            jobs: ctx.jobs.clone(),
            notice: ctx.notice.clone(),
            html: render_results(ctx, Utc::now().date_naive())?,
        })
    }
}

struct ResumeUpload {
    pdf: Bytes,
    location: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let ctx = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated { session_id: ctx.id }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionContext>, AppError> {
    let session = checkout_session(&state, id).await?;
    Ok(Json(session.clone()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload: `file` (PDF, required) and `location` (optional).
/// The resume is analyzed only if the session has no usable analysis yet.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnalysisView>, AppError> {
    let mut session = checkout_session(&state, id).await?;
    let upload = read_resume_upload(multipart).await?;

    let resume_text = extract_text_from_upload(upload.pdf).await?;
    let resume_chars = resume_text.chars().count();
    info!("Session {id}: extracted {resume_chars} characters from resume");

    let outcome = if session.needs_analysis() {
        Some(analyze_resume(&resume_text, state.llm.as_ref()).await)
    } else {
        info!("Session {id}: reusing cached resume analysis");
        None
    };

    *session = record_upload(session.clone(), resume_chars, upload.location, outcome);
    Ok(Json(AnalysisView::from_context(&session)?))
}

/// POST /api/v1/sessions/:id/search
///
/// Starts a fresh search from page 1 with the given filters.
pub async fn handle_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ResultsView>, AppError> {
    let mut session = checkout_session(&state, id).await?;
    let ctx = begin_search(session.clone(), request.filters, request.location);
    *session = fetch_page(&state, ctx, MergeMode::Replace).await?;
    Ok(Json(ResultsView::from_context(&session)?))
}

/// POST /api/v1/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<ResultsView>, AppError> {
    let mut session = checkout_session(&state, id).await?;
    let (ctx, mode) = navigate(session.clone(), request.action);
    *session = fetch_page(&state, ctx, mode).await?;
    Ok(Json(ResultsView::from_context(&session)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

async fn checkout_session(state: &AppState, id: Uuid) -> Result<SessionGuard, AppError> {
    state
        .sessions
        .checkout(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

/// One JSearch call for the context's current page, merged per `mode`.
async fn fetch_page(
    state: &AppState,
    ctx: SessionContext,
    mode: MergeMode,
) -> Result<SessionContext, AppError> {
    let query = ctx.job_query().ok_or_else(|| {
        AppError::Validation(
            "Upload a resume with a recognizable primary role before searching".to_string(),
        )
    })?;

    let outcome = fetch_jobs(state.job_search.as_ref(), &query).await;
    info!(
        "Session {}: page {} returned {} listing(s){}",
        ctx.id,
        query.page,
        outcome.response.data.len(),
        if outcome.failed() { " (request failed)" } else { "" }
    );

    Ok(apply_page_results(ctx, outcome, mode))
}

async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut pdf = None;
    let mut location = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                if !looks_like_pdf(field.file_name(), field.content_type()) {
                    return Err(AppError::Validation(
                        "Only PDF resumes are supported".to_string(),
                    ));
                }
                pdf = Some(field.bytes().await?);
            }
            "location" => location = Some(field.text().await?),
            _ => {}
        }
    }

    let pdf = pdf.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    Ok(ResumeUpload { pdf, location })
}

fn looks_like_pdf(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = file_name.map(|n| n.to_lowercase().ends_with(".pdf"));
    let by_type = content_type.map(|t| t.eq_ignore_ascii_case("application/pdf"));
    match (by_name, by_type) {
        (None, None) => true,
        (name, kind) => name.unwrap_or(false) || kind.unwrap_or(false),
    }
}

//! HTTP route handlers for Axum.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use tracing::{info, warn};

use crate::{
    api::{
        session::Session,
        types::{ExtractRequest, ExtractResponse, StateDto},
        views::DashboardPage,
    },
    data::{self, Dataset, CLEANED_FILE_NAME},
    error::SessionError,
    nlp,
};

use super::AppState;

type ApiResult<T> = Result<T, (StatusCode, String)>;

const UPLOAD_FIELD: &str = "file";

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let mut dashboard = state.dashboard.lock().await;
    let flash = dashboard.flash.take();
    let page = DashboardPage::build(&dashboard.session, flash, &state.settings)
        .map_err(internal)?;
    let html = page.render().map_err(internal)?;
    Ok(Html(html))
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let mut dashboard = state.dashboard.lock().await;
    let Some((file_name, bytes)) = upload else {
        dashboard.flash = Some(format!("no `{UPLOAD_FIELD}` field in upload"));
        return Ok(Redirect::to("/"));
    };

    match Dataset::from_csv_bytes(bytes.to_vec()) {
        Ok(dataset) => {
            info!(
                file = %file_name,
                rows = dataset.row_count(),
                columns = dataset.column_names().len(),
                "loaded upload"
            );
            dashboard.session.upload(file_name, dataset);
        }
        Err(err) => {
            warn!(file = %file_name, %err, "rejected upload");
            dashboard.session.reset();
            dashboard.flash = Some(format!("{file_name}: {err}"));
        }
    }
    Ok(Redirect::to("/"))
}

pub async fn clean(State(state): State<AppState>) -> ApiResult<Redirect> {
    let mut dashboard = state.dashboard.lock().await;
    let raw = dashboard.session.raw().map(|(_, raw)| raw.clone());
    let raw = match raw {
        Ok(raw) => raw,
        Err(err) => {
            dashboard.flash = Some(err.to_string());
            return Ok(Redirect::to("/"));
        }
    };

    let extractor = Arc::clone(&state.extractor);
    let outcome = tokio::task::spawn_blocking(move || data::clean(&raw, &extractor))
        .await
        .map_err(internal)?;

    match outcome {
        Ok(cleaned) => {
            if let Err(err) = dashboard.session.finish_clean(cleaned) {
                dashboard.flash = Some(err.to_string());
            }
        }
        Err(err) => {
            warn!(%err, "cleaning failed");
            dashboard.flash = Some(format!("cleaning failed: {err}"));
        }
    }
    Ok(Redirect::to("/"))
}

pub async fn download(State(state): State<AppState>) -> ApiResult<Response> {
    let dashboard = state.dashboard.lock().await;
    let cleaned = dashboard.session.cleaned().map_err(session_error)?;
    let bytes = cleaned.to_csv_bytes().map_err(internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CLEANED_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> ApiResult<Json<ExtractResponse>> {
    let extractor = Arc::clone(&state.extractor);
    let concepts = tokio::task::spawn_blocking(move || extractor.concepts(&request.text))
        .await
        .map_err(internal)?;
    Ok(Json(ExtractResponse {
        summary: nlp::summarize(&concepts),
        concepts,
    }))
}

pub async fn session_state(State(state): State<AppState>) -> Json<StateDto> {
    let dashboard = state.dashboard.lock().await;
    let session = &dashboard.session;
    let (file_name, current, cleaned_at) = match session {
        Session::Empty => (None, None, None),
        Session::Loaded { file_name, raw } => (Some(file_name.clone()), Some(raw), None),
        Session::Cleaned {
            file_name,
            cleaned,
            cleaned_at,
            ..
        } => (
            Some(file_name.clone()),
            Some(cleaned),
            Some(cleaned_at.to_rfc3339()),
        ),
    };
    Json(StateDto {
        phase: session.phase().to_string(),
        file_name,
        rows: current.map(Dataset::row_count),
        columns: current.map(Dataset::column_names).unwrap_or_default(),
        cleaned_at,
    })
}

fn session_error(err: SessionError) -> (StatusCode, String) {
    let status = match err {
        SessionError::NoDataset | SessionError::NotCleaned => StatusCode::CONFLICT,
        SessionError::Dataset(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, err.to_string())
}

fn internal<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

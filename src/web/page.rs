//! HTML page rendering.
//!
//! One handlebars template serves every response: the empty form, a fit with
//! its chart, the overlay chart, or an error message.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::error;

use crate::domain::FitHistoryEntry;
use crate::error::AppError;
use crate::fit::FitSelection;
use crate::report::{fit_headline, format_candidates};

const INDEX: &str = "index";

/// Everything the template can show.
#[derive(Debug, Default, Serialize)]
pub struct PageView {
    pub image_url: Option<String>,
    /// Informational notice (e.g. nothing to overlay).
    pub message: Option<String>,
    pub error: Option<String>,
    pub summary: Option<FitSummary>,
    pub history: Vec<HistoryRow>,
}

#[derive(Debug, Serialize)]
pub struct FitSummary {
    pub title: String,
    pub headline: String,
    pub polynomial: String,
    pub n: usize,
    pub candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub index: usize,
    pub title: String,
    pub degree: usize,
    pub r_squared: String,
    pub n: usize,
    pub recorded_at: String,
}

impl PageView {
    pub fn new(history: &[FitHistoryEntry]) -> Self {
        Self {
            history: history_rows(history),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error(mut self, err: &AppError) -> Self {
        self.error = Some(format!("An error occurred: {err}"));
        self
    }

    pub fn with_summary(mut self, entry: &FitHistoryEntry, selection: &FitSelection) -> Self {
        self.summary = Some(FitSummary {
            title: entry.labels.title.clone(),
            headline: fit_headline(&entry.fit),
            polynomial: format!("y = {}", entry.fit.polynomial),
            n: entry.fit.n,
            candidates: format_candidates(selection),
        });
        self
    }
}

fn history_rows(history: &[FitHistoryEntry]) -> Vec<HistoryRow> {
    history
        .iter()
        .enumerate()
        .map(|(i, entry)| HistoryRow {
            index: i + 1,
            title: entry.labels.title.clone(),
            degree: entry.fit.degree,
            r_squared: format!("{:.4}", entry.fit.r_squared),
            n: entry.fit.n,
            recorded_at: entry.recorded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect()
}

/// Compiled page templates.
#[derive(Debug)]
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(INDEX, include_str!("templates/index.hbs"))
            .map_err(|e| AppError::Config(format!("page template: {e}")))?;
        Ok(Self { registry })
    }

    pub fn render(&self, view: &PageView) -> Result<String, AppError> {
        self.registry
            .render(INDEX, view)
            .map_err(|e| AppError::Render(format!("page template: {e}")))
    }

    /// Render `view` as the response body with `status`.
    pub fn respond(&self, status: StatusCode, view: &PageView) -> Response {
        match self.render(view) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                error!(error = %err, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

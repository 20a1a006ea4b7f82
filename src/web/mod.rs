//! HTTP front-end: the fit form, its result page, and the rendered images.
//!
//! Routes:
//! - `GET /` shows the form
//! - `POST /` fits submitted samples or overlays every fit so far
//! - `POST /reset` forgets the fit history
//! - `GET /static/*` serves rendered PNGs

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::ServerConfig;
use crate::app::config::STATIC_URL_PREFIX;
use crate::app::pipeline;
use crate::domain::Action;
use crate::error::AppError;
use crate::history::FitHistory;
use crate::plot::{ChartRenderer, ImageStore, PlotSize, PlottersRenderer};

pub mod form;
pub mod page;

pub use form::{FitForm, UploadedFile};
pub use page::{PageView, Pages};

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub history: FitHistory,
    pub images: ImageStore,
    pub plot_size: PlotSize,
    renderer: Arc<dyn ChartRenderer>,
    pages: Pages,
}

impl AppState {
    /// State drawing PNGs with Plotters.
    pub fn new(static_dir: impl Into<PathBuf>, plot_size: PlotSize) -> Result<Self, AppError> {
        Self::with_renderer(static_dir, plot_size, Arc::new(PlottersRenderer))
    }

    pub fn with_renderer(
        static_dir: impl Into<PathBuf>,
        plot_size: PlotSize,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            history: FitHistory::new(),
            images: ImageStore::new(static_dir, STATIC_URL_PREFIX),
            plot_size,
            renderer,
            pages: Pages::new()?,
        })
    }
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let static_files = ServeDir::new(state.images.dir());
    Router::new()
        .route("/", get(index).post(submit))
        .route("/reset", post(reset))
        .nest_service(STATIC_URL_PREFIX, static_files)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), AppError> {
    let state = Arc::new(AppState::new(config.static_dir.clone(), config.plot_size)?);
    let app = router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|e| AppError::Io(format!("Failed to bind {}: {e}", config.addr)))?;
    info!(
        addr = %config.addr,
        static_dir = %config.static_dir.display(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    let view = PageView::new(&state.history.snapshot());
    state.pages.respond(StatusCode::OK, &view)
}

async fn submit(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    match handle_submission(&state, multipart).await {
        Ok(view) => state.pages.respond(StatusCode::OK, &view),
        Err(err) => {
            warn!(error = %err, "request failed");
            let view = PageView::new(&state.history.snapshot()).with_error(&err);
            state.pages.respond(err.status(), &view)
        }
    }
}

async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dropped = state.history.clear();
    info!(dropped, "history cleared");
    Redirect::to("/")
}

async fn handle_submission(state: &Arc<AppState>, multipart: Multipart) -> Result<PageView, AppError> {
    let form = FitForm::from_multipart(multipart).await?;

    match form.action() {
        Action::Overlay => {
            let entries = state.history.snapshot();
            if entries.is_empty() {
                return Ok(PageView::new(&entries).with_message("No fits to overlay yet."));
            }

            let task_state = Arc::clone(state);
            let task_entries = entries.clone();
            let image = tokio::task::spawn_blocking(move || {
                pipeline::render_overlay_image(
                    &task_state.images,
                    task_state.renderer.as_ref(),
                    &task_entries,
                    task_state.plot_size,
                )
            })
            .await
            .map_err(|e| AppError::Render(format!("overlay task failed: {e}")))??;

            info!(fits = entries.len(), url = %image.url, "overlay rendered");
            Ok(PageView::new(&entries).with_image(image.url))
        }
        Action::Fit => {
            let samples = form.samples()?;
            let degree = form.degree()?;
            let labels = form.labels();

            let task_state = Arc::clone(state);
            let (run, image) = tokio::task::spawn_blocking(move || {
                let run = pipeline::run_fit(samples, degree, labels)?;
                let image = pipeline::render_fit_image(
                    &task_state.images,
                    task_state.renderer.as_ref(),
                    &run.entry,
                    task_state.plot_size,
                )?;
                Ok::<_, AppError>((run, image))
            })
            .await
            .map_err(|e| AppError::Render(format!("fit task failed: {e}")))??;

            state.history.record(run.entry.clone());
            info!(url = %image.url, history = state.history.len(), "fit rendered");

            Ok(PageView::new(&state.history.snapshot())
                .with_summary(&run.entry, &run.selection)
                .with_image(image.url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use crate::domain::{FitHistoryEntry, FitResult, PlotLabels, SampleSet};

    const BOUNDARY: &str = "poly-test-boundary";

    /// Writes a marker file instead of a real chart, so handlers can be
    /// exercised without system fonts.
    #[derive(Debug)]
    struct MarkerRenderer;

    impl ChartRenderer for MarkerRenderer {
        fn render_fit(
            &self,
            path: &Path,
            _samples: &SampleSet,
            fit: &FitResult,
            labels: &PlotLabels,
            _size: PlotSize,
        ) -> Result<(), AppError> {
            std::fs::write(path, format!("fit {} degree {}", labels.title, fit.degree))?;
            Ok(())
        }

        fn render_overlay(&self, path: &Path, entries: &[FitHistoryEntry], _size: PlotSize) -> Result<(), AppError> {
            std::fs::write(path, format!("overlay of {}", entries.len()))?;
            Ok(())
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let state = AppState::with_renderer(dir.path().join("static"), PlotSize::default(), Arc::new(MarkerRenderer));
            Self {
                _dir: dir,
                state: Arc::new(state.unwrap()),
            }
        }

        fn app(&self) -> Router {
            router(Arc::clone(&self.state), 1024 * 1024)
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
                    );
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// First `src` attribute pointing under `/static/<prefix>_`.
    fn image_url(html: &str, prefix: &str) -> String {
        let needle = format!("{STATIC_URL_PREFIX}/{prefix}_");
        let start = html.find(&needle).unwrap_or_else(|| panic!("no {needle} in page"));
        let end = start + html[start..].find('"').unwrap();
        html[start..end].to_string()
    }

    async fn fetch(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn manual_fit_records_history_and_serves_the_image() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(multipart_request(&[
                Part::Text("title", "squares"),
                Part::Text("method", "manual"),
                Part::Text("x_values", "1,2,3,4"),
                Part::Text("y_values", "1,4,9,16"),
                Part::Text("degree", "2"),
                Part::Text("action", "fit"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.state.history.len(), 1);
        assert_eq!(h.state.history.snapshot()[0].labels.title, "squares");

        let html = body_text(response).await;
        assert!(html.contains("squares"));
        let url = image_url(&html, "fit");
        assert!(url.ends_with(".png"), "{url}");

        let image = fetch(h.app(), &url).await;
        assert_eq!(image.status(), StatusCode::OK);
        assert_eq!(body_text(image).await, "fit squares degree 2");
    }

    #[tokio::test]
    async fn overlay_after_fits_draws_every_entry() {
        let h = Harness::new();
        for (title, ys) in [("line", "2,4,6,8"), ("curve", "1,4,9,16")] {
            let response = h
                .app()
                .oneshot(multipart_request(&[
                    Part::Text("title", title),
                    Part::Text("x_values", "1,2,3,4"),
                    Part::Text("y_values", ys),
                ]))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(h.state.history.len(), 2);

        let response = h
            .app()
            .oneshot(multipart_request(&[Part::Text("action", "overlay")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(!html.contains("No fits to overlay yet."));

        let image = fetch(h.app(), &image_url(&html, "overlay")).await;
        assert_eq!(body_text(image).await, "overlay of 2");
        assert_eq!(h.state.history.len(), 2);
    }

    #[tokio::test]
    async fn get_index_renders_form() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form"));
    }

    #[tokio::test]
    async fn overlay_without_history_shows_message() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(multipart_request(&[Part::Text("action", "overlay")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No fits to overlay yet."));
        assert!(!h.state.images.dir().exists());
    }

    #[tokio::test]
    async fn mismatched_lengths_are_a_bad_request() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(multipart_request(&[
                Part::Text("method", "manual"),
                Part::Text("x_values", "1,2,3"),
                Part::Text("y_values", "1,2"),
                Part::Text("action", "fit"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("An error occurred: X and Y must have the same number of values"));
        assert!(h.state.history.is_empty());
    }

    #[tokio::test]
    async fn constant_data_is_unprocessable() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(multipart_request(&[
                Part::Text("x_values", "1,2,3"),
                Part::Text("y_values", "5,5,5"),
                Part::Text("degree", "1"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("All y-values are identical"));
        assert!(h.state.history.is_empty());
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected() {
        let h = Harness::new();
        let response = h
            .app()
            .oneshot(multipart_request(&[
                Part::Text("method", "file"),
                Part::File {
                    name: "file",
                    file_name: "plot.png",
                    content_type: "image/png",
                    bytes: b"\x89PNG",
                },
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Unsupported file type"));
    }

    #[tokio::test]
    async fn reset_clears_history_and_redirects() {
        let h = Harness::new();
        let samples = crate::domain::SampleSet::new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 7.0]).unwrap();
        let run = pipeline::run_fit(samples, crate::domain::DegreeSpec::Fixed(1), Default::default()).unwrap();
        h.state.history.record(run.entry);

        let response = h
            .app()
            .oneshot(Request::builder().method("POST").uri("/reset").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(h.state.history.is_empty());
    }
}

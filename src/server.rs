//! HTTP boundary for the analyzer.
//!
//! | route | method | response |
//! |-------|--------|----------|
//! | `/analyze-sentiment` | `POST` `{"review_text": "..."}` | [`AnalysisResult`] as JSON |
//! | `/health` | `GET` | `{"status": "ok", "service": "Sentiment Analyzer"}` |
//! | `/` | `GET` | landing page |
//!
//! Analyzer failures become `500` with `{"detail": "<message>"}`. Predictions run on the
//! blocking pool so a slow forward pass never stalls the async workers, and the analyzer
//! lets only one of them use the model at a time.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::error::AnalyzerError;
use crate::sentiment::{AnalysisResult, Preprocessor, SentimentAnalyzer, SentimentModel};

/// Name reported by `/health`.
pub const SERVICE_NAME: &str = "Sentiment Analyzer";

const FALLBACK_LANDING: &str = r#"<!DOCTYPE html>
<html>
    <head><meta charset="utf-8"><title>Sentimiento</title></head>
    <body style="font-family: Arial; text-align: center; padding: 50px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; min-height: 100vh; display: flex; align-items: center; justify-content: center; margin: 0;">
        <div>
            <h1 style="font-size: 4rem; margin-bottom: 1rem;">Sentimiento</h1>
            <p style="font-size: 1.5rem;">Análisis de Sentimientos en Español</p>
        </div>
    </body>
</html>
"#;

/// Request body of `POST /analyze-sentiment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Review to analyze. Any string, including the empty one.
    pub review_text: String,
}

/// Shared state of the router.
pub struct AppState<M: SentimentModel, P: Preprocessor> {
    analyzer: Arc<SentimentAnalyzer<M, P>>,
    index_path: Arc<PathBuf>,
}

impl<M: SentimentModel, P: Preprocessor> Clone for AppState<M, P> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
            index_path: Arc::clone(&self.index_path),
        }
    }
}

/// Build the service router around a shared analyzer.
///
/// `index_path` is read on every `GET /`; when it cannot be read a built-in page is served.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sentimiento::sentiment::SentimentAnalyzerBuilder;
///
/// #[tokio::main]
/// async fn main() -> std::io::Result<()> {
///     let analyzer = Arc::new(SentimentAnalyzerBuilder::robertuito().build());
///     let router = sentimiento::server::router(analyzer, "index.html");
///
///     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
///     axum::serve(listener, router).await
/// }
/// ```
pub fn router<M, P>(analyzer: Arc<SentimentAnalyzer<M, P>>, index_path: impl Into<PathBuf>) -> Router
where
    M: SentimentModel + 'static,
    P: Preprocessor + 'static,
{
    let state = AppState {
        analyzer,
        index_path: Arc::new(index_path.into()),
    };

    Router::new()
        .route("/", get(landing_page::<M, P>))
        .route("/analyze-sentiment", post(analyze_sentiment::<M, P>))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn landing_page<M, P>(State(state): State<AppState<M, P>>) -> Html<String>
where
    M: SentimentModel + 'static,
    P: Preprocessor + 'static,
{
    match tokio::fs::read_to_string(state.index_path.as_path()).await {
        Ok(page) => Html(page),
        Err(e) => {
            debug!(path = %state.index_path.display(), error = %e, "serving built-in landing page");
            Html(FALLBACK_LANDING.to_string())
        }
    }
}

async fn analyze_sentiment<M, P>(
    State(state): State<AppState<M, P>>,
    Json(review): Json<Review>,
) -> Result<Json<AnalysisResult>, ApiError>
where
    M: SentimentModel + 'static,
    P: Preprocessor + 'static,
{
    let analyzer = Arc::clone(&state.analyzer);
    let result = tokio::task::spawn_blocking(move || {
        analyzer.analyze_review_sentiment(&review.review_text)
    })
    .await
    .map_err(|e| AnalyzerError::Unexpected(format!("analysis task failed: {e}")))??;

    Ok(Json(result))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

/// An [`AnalyzerError`] on its way out as an HTTP `500`.
#[derive(Debug)]
pub struct ApiError(pub AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(value: AnalyzerError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "sentiment analysis failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.0.to_string() })),
        )
            .into_response()
    }
}

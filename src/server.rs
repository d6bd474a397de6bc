use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tracing::error;

use crate::app::App;
use crate::rcsb::RcsbClient;

const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");

/// Envelope returned with a 500 on any lookup failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
    pub trace: String,
}

/// Builds the web surface: the lookup route plus the static front end. The
/// route layer depends only on `App`'s public contract.
pub fn router<R: RcsbClient + 'static>(app: Arc<App<R>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/app.js", get(app_js))
        .route("/pdb/{id}", get(pdb_lookup::<R>))
        .with_state(app)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], APP_JS)
}

async fn pdb_lookup<R: RcsbClient + 'static>(
    State(app): State<Arc<App<R>>>,
    Path(id): Path<String>,
) -> Response {
    let requested = id.clone();
    // The lookup is blocking I/O end to end; keep it off the runtime workers.
    let outcome = tokio::task::spawn_blocking(move || app.get_pdb_info(&id)).await;
    match outcome {
        Ok(Ok(record)) => Json(record).into_response(),
        Ok(Err(err)) => {
            error!(id = %requested, %err, "lookup failed");
            error_response(&requested, &err.to_string(), format!("{err:?}"))
        }
        Err(err) => {
            error!(id = %requested, %err, "lookup task panicked");
            error_response(&requested, "lookup task failed", format!("{err:?}"))
        }
    }
}

fn error_response(id: &str, details: &str, trace: String) -> Response {
    let body = ErrorBody {
        error: format!("Failed to fetch PDB info for {id}"),
        details: details.to_string(),
        trace,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

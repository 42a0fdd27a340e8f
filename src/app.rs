use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{field, Span};

use crate::state::AppState;
use crate::{auth, characters, status};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/test", get(status::test_database))
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(characters::router()),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(record_response),
        )
}

/// One span per request, keyed by the route template when one matched.
fn request_span(req: &Request<Body>) -> Span {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        route,
        status = field::Empty,
        elapsed_ms = field::Empty,
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    span.record("elapsed_ms", latency.as_millis() as u64);
    match status.as_u16() {
        500.. => tracing::error!(%status, "request failed"),
        400..=499 => tracing::warn!(%status, "request rejected"),
        _ => tracing::debug!(%status, "request served"),
    }
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

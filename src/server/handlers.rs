use super::response::{ApiError, ApiResponse};
use super::AppState;
use crate::feed::DEFAULT_SOURCE;
use axum::extract::{Query, State};
use axum::Json;

/// `GET /trending-news?source=<id>`
///
/// The query is taken as raw pairs so a repeated `source` never rejects the
/// request; the first occurrence wins and a missing one means `google`.
pub async fn trending_news(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let source = first_param(&params, "source").unwrap_or(DEFAULT_SOURCE);
    let headlines = state.pipeline.run(source).await.inspect_err(|e| {
        tracing::warn!(source = %source, error = %e, "Trending news request failed");
    })?;
    tracing::info!(source = %source, headlines = headlines.len(), "Served trending news");
    Ok(Json(ApiResponse::Success { headlines }))
}

fn first_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

use axum::Json;

use crate::adapter_http_server::handler::ApiPath;

#[derive(Debug, serde::Deserialize)]
pub struct IssuePath {
    owner: String,
    repo: String,
    issue_number: u64,
}

/// Discards the labels and answers with an empty object.
pub async fn handler(ApiPath(path): ApiPath<IssuePath>) -> Json<serde_json::Value> {
    tracing::debug!(
        owner = %path.owner,
        repo = %path.repo,
        issue_number = path.issue_number,
        "labels ignored"
    );
    Json(serde_json::json!({}))
}

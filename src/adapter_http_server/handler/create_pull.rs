use axum::Json;
use axum::http::StatusCode;

use crate::adapter_http_server::handler::{ApiPath, RepositoryPath};
use crate::domain::entity::PullRequest;

/// Accepts any pull request and answers with an empty one, nothing is kept.
pub async fn handler(ApiPath(path): ApiPath<RepositoryPath>) -> (StatusCode, Json<PullRequest>) {
    tracing::debug!(owner = %path.owner, repo = %path.repo, "pull request ignored");
    (StatusCode::CREATED, Json(PullRequest::default()))
}

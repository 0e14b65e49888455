use axum::extract::State;
use axum::http::StatusCode;

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, ReleasePath};
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<ReleasePath>,
) -> Result<StatusCode, ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    state.releases.delete_release(path.release_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

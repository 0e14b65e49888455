use axum::Json;
use axum::extract::State;

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, ReleasePath};
use crate::domain::entity::Release;
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<ReleasePath>,
) -> Result<Json<Release>, ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let release = state.releases.get_release(path.release_id).await?;
    Ok(Json(release))
}

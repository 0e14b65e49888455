use axum::Json;
use axum::extract::State;

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, ReleasePath};
use crate::domain::entity::Asset;
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<ReleasePath>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let assets = state.assets.list_assets(path.release_id).await?;
    Ok(Json(assets))
}

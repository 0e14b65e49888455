use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath};
use crate::domain::entity::DEFAULT_CONTENT_TYPE;
use crate::domain::prelude::{AssetManager, ReleaseManager};

/// Streams the bytes behind an asset `url`.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(asset_id): ApiPath<u64>,
) -> Result<Response, ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let content = state.assets.asset_content(asset_id).await?;
    Ok((
        [(header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE)],
        Body::from_stream(content),
    )
        .into_response())
}

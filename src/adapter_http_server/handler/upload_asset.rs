use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use futures::{StreamExt, TryStreamExt};

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, ApiQuery, ReleasePath};
use crate::domain::entity::{Asset, AssetUpload};
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[derive(Debug, Default, serde::Deserialize)]
pub struct UploadQuery {
    name: Option<String>,
    label: Option<String>,
}

fn header_value(
    headers: &HeaderMap,
    name: header::HeaderName,
) -> Result<Option<&str>, ApiError> {
    headers
        .get(&name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ApiError::bad_request(format!("invalid {name} header")))
        })
        .transpose()
}

/// Streams the request body into the blob store.
///
/// `content-length` is trusted as the asset size, chunked uploads fall back
/// to the number of bytes written.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<ReleasePath>,
    ApiQuery(query): ApiQuery<UploadQuery>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<Asset>), ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let content_type = header_value(&headers, header::CONTENT_TYPE)?.map(String::from);
    let declared_size = header_value(&headers, header::CONTENT_LENGTH)?
        .map(|value| {
            value
                .parse::<u64>()
                .map_err(|_| ApiError::bad_request("invalid content-length header"))
        })
        .transpose()?;
    let upload = AssetUpload {
        name: query.name,
        label: query.label,
        content_type,
        declared_size,
    };
    let content = body
        .into_data_stream()
        .map_err(std::io::Error::other)
        .boxed();
    let asset = state
        .assets
        .upload_asset(path.release_id, upload, content)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

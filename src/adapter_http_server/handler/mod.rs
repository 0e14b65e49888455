use std::borrow::Cow;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use crate::adapter_http_server::ServerState;
use crate::domain::error::Error;
use crate::domain::prelude::{AssetManager, ReleaseManager};

mod add_labels;
mod create_pull;
mod create_release;
mod delete_release;
mod download_asset;
mod get_release;
mod list_assets;
mod list_releases;
mod root;
mod update_release;
mod upload_asset;

pub fn build<RM, AM>() -> axum::Router<ServerState<RM, AM>>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    axum::Router::new()
        .route("/", get(root::handler))
        .route(
            "/repos/{owner}/{repo}/releases",
            get(list_releases::handler::<RM, AM>).post(create_release::handler::<RM, AM>),
        )
        .route(
            "/repos/{owner}/{repo}/releases/{release_id}",
            get(get_release::handler::<RM, AM>)
                .patch(update_release::handler::<RM, AM>)
                .delete(delete_release::handler::<RM, AM>),
        )
        .route(
            "/repos/{owner}/{repo}/releases/{release_id}/assets",
            get(list_assets::handler::<RM, AM>).post(upload_asset::handler::<RM, AM>),
        )
        .route("/static/{asset_id}", get(download_asset::handler::<RM, AM>))
        .route("/repos/{owner}/{repo}/pulls", post(create_pull::handler))
        .route(
            "/repos/{owner}/{repo}/issues/{issue_number}/labels",
            post(add_labels::handler),
        )
}

/// Like [`Path`], with rejections rendered as [`ApiError`].
#[derive(Debug)]
struct ApiPath<T>(T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Like [`Query`], with rejections rendered as [`ApiError`].
#[derive(Debug)]
struct ApiQuery<T>(T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, serde::Deserialize)]
struct RepositoryPath {
    owner: String,
    repo: String,
}

impl From<RepositoryPath> for crate::domain::entity::Repository {
    fn from(value: RepositoryPath) -> Self {
        Self::new(value.owner, value.repo)
    }
}

/// Owner and repository only namespace the URL, the release id is global.
#[derive(Debug, serde::Deserialize)]
struct ReleasePath {
    #[allow(dead_code)]
    owner: String,
    #[allow(dead_code)]
    repo: String,
    release_id: u64,
}

#[derive(Debug)]
struct ApiError {
    status_code: axum::http::StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    #[inline]
    fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code: axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    #[inline]
    fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code: axum::http::StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[inline]
    fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code: axum::http::StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        match value {
            Error::NotFound { .. } => Self::not_found(value.to_string()),
            Error::Validation(message) => Self::bad_request(message),
            Error::Internal(err) => {
                tracing::error!(error = ?err, "something went wrong");
                Self::internal("internal server error")
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self {
            status_code: value.status(),
            message: value.body_text().into(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self {
            status_code: value.status(),
            message: value.body_text().into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status_code,
            axum::Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}

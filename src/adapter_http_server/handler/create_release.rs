use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, RepositoryPath};
use crate::domain::entity::{CreateRelease, Release};
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<RepositoryPath>,
    body: Bytes,
) -> Result<(StatusCode, Json<Release>), ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let payload: CreateRelease = serde_json::from_slice(&body)
        .map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))?;
    let release = state
        .releases
        .create_release(&path.into(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(release)))
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::StatusCode;

    use crate::adapter_http_server::ServerState;
    use crate::adapter_http_server::handler::{ApiPath, RepositoryPath};
    use crate::domain::entity::Release;
    use crate::domain::error::Error;
    use crate::domain::prelude::{MockAssetManager, MockReleaseManager};

    fn path() -> ApiPath<RepositoryPath> {
        ApiPath(RepositoryPath {
            owner: "foo".into(),
            repo: "bar".into(),
        })
    }

    #[tokio::test]
    async fn should_create_release() {
        let mut releases = MockReleaseManager::new();
        releases
            .expect_create_release()
            .withf(|repo, payload| {
                repo.owner == "foo"
                    && payload.tag_name.as_deref() == Some("v1.0.0")
                    && payload.draft == Some(true)
                    && payload.prerelease == Some(false)
            })
            .once()
            .return_once(|_, _| {
                Box::pin(async {
                    Ok(Release {
                        id: 1,
                        tag_name: "v1.0.0".into(),
                        html_url: "/foo/bar/releases/v1.0.0".into(),
                        draft: true,
                        ..Default::default()
                    })
                })
            });

        let (status, release) = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(),
            Bytes::from_static(
                br#"{"tag_name":"v1.0.0","target_commitish":"main","name":"v1.0.0","body":"","draft":true,"prerelease":false}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(release.0.id, 1);
        assert!(release.0.html_url.ends_with("/releases/v1.0.0"));
    }

    #[tokio::test]
    async fn should_reject_malformed_body() {
        let mut releases = MockReleaseManager::new();
        releases.expect_create_release().never();

        let err = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(),
            Bytes::from_static(b"{not json"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_forward_validation_error() {
        let mut releases = MockReleaseManager::new();
        releases
            .expect_create_release()
            .once()
            .return_once(|_, _| Box::pin(async { Err(Error::missing_field("tag_name")) }));

        let err = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(),
            Bytes::from_static(br#"{"draft":true}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "missing field \"tag_name\"");
    }
}

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use crate::adapter_http_server::ServerState;
use crate::adapter_http_server::handler::{ApiError, ApiPath, ReleasePath};
use crate::domain::entity::{Release, ReleaseUpdate};
use crate::domain::prelude::{AssetManager, ReleaseManager};

#[tracing::instrument(skip_all, err(Debug))]
pub async fn handler<RM, AM>(
    State(state): State<ServerState<RM, AM>>,
    ApiPath(path): ApiPath<ReleasePath>,
    body: Bytes,
) -> Result<Json<Release>, ApiError>
where
    RM: ReleaseManager + Clone,
    AM: AssetManager + Clone,
{
    let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&body)
        .map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))?;
    let changes = ReleaseUpdate::try_from(fields)?;
    let release = state
        .releases
        .update_release(path.release_id, changes)
        .await?;
    Ok(Json(release))
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::StatusCode;

    use crate::adapter_http_server::ServerState;
    use crate::adapter_http_server::handler::{ApiPath, ReleasePath};
    use crate::domain::entity::{Release, ReleaseUpdate};
    use crate::domain::error::Error;
    use crate::domain::prelude::{MockAssetManager, MockReleaseManager};

    fn path(release_id: u64) -> ApiPath<ReleasePath> {
        ApiPath(ReleasePath {
            owner: "foo".into(),
            repo: "bar".into(),
            release_id,
        })
    }

    #[tokio::test]
    async fn should_update_draft_only() {
        let mut releases = MockReleaseManager::new();
        releases
            .expect_update_release()
            .withf(|id, changes| {
                *id == 1
                    && *changes
                        == ReleaseUpdate {
                            draft: Some(false),
                            ..Default::default()
                        }
            })
            .once()
            .return_once(|_, _| {
                Box::pin(async {
                    Ok(Release {
                        id: 1,
                        tag_name: "v1.0.0".into(),
                        draft: false,
                        ..Default::default()
                    })
                })
            });

        let res = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(1),
            Bytes::from_static(br#"{"draft":false}"#),
        )
        .await
        .unwrap();
        assert!(!res.0.draft);
        assert_eq!(res.0.tag_name, "v1.0.0");
    }

    #[tokio::test]
    async fn should_reject_unknown_field_before_calling_service() {
        let mut releases = MockReleaseManager::new();
        releases.expect_update_release().never();

        let err = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(1),
            Bytes::from_static(br#"{"draft":false,"upload_url":"http://evil"}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_reject_non_object_body() {
        let mut releases = MockReleaseManager::new();
        releases.expect_update_release().never();

        let err = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(1),
            Bytes::from_static(b"[1, 2]"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_release() {
        let mut releases = MockReleaseManager::new();
        releases
            .expect_update_release()
            .once()
            .return_once(|id, _| Box::pin(async move { Err(Error::release_not_found(id)) }));

        let err = super::handler(
            State(ServerState {
                releases,
                assets: MockAssetManager::new(),
            }),
            path(9),
            Bytes::from_static(br#"{"draft":false}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
    }
}

use std::marker::PhantomData;
use std::sync::Arc;

use super::entity::{CreateRelease, Release, ReleaseUpdate, Repository, format_timestamp};
use super::error::Error;
use super::prelude::{Clock, IdGenerator, ReleaseStore};

#[derive(Clone, Debug)]
pub(crate) struct ReleaseService<RS, IG, C = chrono::Utc> {
    public_url: Arc<str>,
    store: RS,
    ids: IG,
    clock: PhantomData<C>,
}

impl<RS, IG, C> ReleaseService<RS, IG, C> {
    pub fn new(public_url: Arc<str>, store: RS, ids: IG) -> Self {
        Self {
            public_url,
            store,
            ids,
            clock: PhantomData,
        }
    }
}

impl<RS, IG, C> super::prelude::ReleaseManager for ReleaseService<RS, IG, C>
where
    RS: ReleaseStore,
    IG: IdGenerator,
    C: Clock,
{
    #[tracing::instrument(skip(self), err(Debug))]
    async fn list_releases(&self, repo: &Repository) -> Result<Vec<Release>, Error> {
        // every repository shares the same registry
        Ok(self.store.list_releases().await)
    }

    #[tracing::instrument(skip(self, payload), err(Debug))]
    async fn create_release(
        &self,
        repo: &Repository,
        payload: CreateRelease,
    ) -> Result<Release, Error> {
        let tag_name = payload
            .tag_name
            .ok_or_else(|| Error::missing_field("tag_name"))?;
        let target_commitish = payload
            .target_commitish
            .ok_or_else(|| Error::missing_field("target_commitish"))?;
        let draft = payload.draft.ok_or_else(|| Error::missing_field("draft"))?;
        let prerelease = payload
            .prerelease
            .ok_or_else(|| Error::missing_field("prerelease"))?;

        let id = self.ids.next_id();
        let url = format!(
            "{}/repos/{}/{}/releases/{id}",
            self.public_url, repo.owner, repo.name
        );
        let release = Release {
            id,
            html_url: format!(
                "{}/{}/{}/releases/{tag_name}",
                self.public_url, repo.owner, repo.name
            ),
            upload_url: format!("{url}/assets"),
            assets_url: format!("{url}/assets"),
            url,
            tag_name,
            target_commitish,
            name: payload.name.unwrap_or_default(),
            body: payload.body.unwrap_or_default(),
            draft,
            prerelease,
            created_at: format_timestamp(C::now()),
            assets: Vec::new(),
            ..Default::default()
        };
        self.store.insert_release(release.clone()).await;
        tracing::info!(release_id = id, tag_name = %release.tag_name, "release created");
        Ok(release)
    }

    #[tracing::instrument(skip(self), err(Debug))]
    async fn get_release(&self, release_id: u64) -> Result<Release, Error> {
        self.store
            .find_release(release_id)
            .await
            .ok_or_else(|| Error::release_not_found(release_id))
    }

    #[tracing::instrument(skip(self), err(Debug))]
    async fn update_release(
        &self,
        release_id: u64,
        changes: ReleaseUpdate,
    ) -> Result<Release, Error> {
        self.store
            .update_release(release_id, changes)
            .await
            .ok_or_else(|| Error::release_not_found(release_id))
    }

    #[tracing::instrument(skip(self), err(Debug))]
    async fn delete_release(&self, release_id: u64) -> Result<(), Error> {
        let removed = self
            .store
            .remove_release(release_id)
            .await
            .ok_or_else(|| Error::release_not_found(release_id))?;
        // uploaded blobs stay on disk until the process exits
        tracing::info!(
            release_id,
            orphan_assets = removed.assets.len(),
            "release deleted"
        );
        Ok(())
    }
}

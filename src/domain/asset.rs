use std::marker::PhantomData;

use super::entity::{Asset, AssetUpload, DEFAULT_CONTENT_TYPE, format_timestamp};
use super::error::Error;
use super::prelude::{BlobStore, ByteStream, Clock, IdGenerator, ReleaseStore};

#[derive(Clone, Debug)]
pub(crate) struct AssetService<RS, BS, IG, C = chrono::Utc> {
    store: RS,
    blobs: BS,
    ids: IG,
    clock: PhantomData<C>,
}

impl<RS, BS, IG, C> AssetService<RS, BS, IG, C> {
    pub fn new(store: RS, blobs: BS, ids: IG) -> Self {
        Self {
            store,
            blobs,
            ids,
            clock: PhantomData,
        }
    }
}

impl<RS, BS, IG, C> super::prelude::AssetManager for AssetService<RS, BS, IG, C>
where
    RS: ReleaseStore,
    BS: BlobStore,
    IG: IdGenerator,
    C: Clock,
{
    #[tracing::instrument(skip(self, content), err(Debug))]
    async fn upload_asset(
        &self,
        release_id: u64,
        upload: AssetUpload,
        content: ByteStream,
    ) -> Result<Asset, Error> {
        let name = upload
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::missing_field("name"))?;
        if self.store.find_release(release_id).await.is_none() {
            return Err(Error::release_not_found(release_id));
        }

        let asset_id = self.ids.next_id();
        let stored = self.blobs.put(asset_id, content).await?;
        let url = self.blobs.resolve_url(asset_id);
        let now = format_timestamp(C::now());
        let asset = Asset {
            id: asset_id,
            name,
            label: upload.label.unwrap_or_default(),
            content_type: upload
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            size: upload.declared_size.unwrap_or(stored.size),
            browser_download_url: url.clone(),
            url,
            created_at: now.clone(),
            updated_at: now,
            ..Default::default()
        };

        if !self.store.append_asset(release_id, asset.clone()).await {
            tracing::warn!(
                release_id,
                asset_id,
                path = ?stored.path,
                "release removed while uploading, blob left behind"
            );
            return Err(Error::release_not_found(release_id));
        }
        tracing::info!(
            release_id,
            asset_id,
            declared = ?upload.declared_size,
            written = stored.size,
            "asset uploaded"
        );
        Ok(asset)
    }

    #[tracing::instrument(skip(self), err(Debug))]
    async fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>, Error> {
        self.store
            .find_release(release_id)
            .await
            .map(|release| release.assets)
            .ok_or_else(|| Error::release_not_found(release_id))
    }

    #[tracing::instrument(skip(self), err(Debug))]
    async fn asset_content(&self, asset_id: u64) -> Result<ByteStream, Error> {
        self.blobs
            .read(asset_id)
            .await?
            .ok_or_else(|| Error::asset_not_found(asset_id))
    }
}

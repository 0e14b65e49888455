use chrono::{DateTime, Utc};

use super::entity::*;
use super::error::Error;

/// Bytes of an uploaded asset, as they come off the wire.
pub type ByteStream = futures::stream::BoxStream<'static, std::io::Result<bytes::Bytes>>;

/// Release lifecycle exposed to the HTTP layer.
pub trait ReleaseManager: Send + Sync + 'static {
    /// List every known release, in creation order.
    fn list_releases(
        &self,
        repo: &Repository,
    ) -> impl Future<Output = Result<Vec<Release>, Error>> + Send;

    /// Create a release and derive its URLs.
    fn create_release(
        &self,
        repo: &Repository,
        payload: CreateRelease,
    ) -> impl Future<Output = Result<Release, Error>> + Send;

    fn get_release(&self, release_id: u64) -> impl Future<Output = Result<Release, Error>> + Send;

    /// Apply allow-listed changes to an existing release.
    fn update_release(
        &self,
        release_id: u64,
        changes: ReleaseUpdate,
    ) -> impl Future<Output = Result<Release, Error>> + Send;

    fn delete_release(&self, release_id: u64) -> impl Future<Output = Result<(), Error>> + Send;
}

#[cfg(test)]
mockall::mock! {
    pub ReleaseManager {}

    impl Clone for ReleaseManager {
        fn clone(&self) -> Self;
    }

    impl ReleaseManager for ReleaseManager {
        fn list_releases(
            &self,
            repo: &Repository,
        ) -> impl Future<Output = Result<Vec<Release>, Error>> + Send;

        fn create_release(
            &self,
            repo: &Repository,
            payload: CreateRelease,
        ) -> impl Future<Output = Result<Release, Error>> + Send;

        fn get_release(&self, release_id: u64) -> impl Future<Output = Result<Release, Error>> + Send;

        fn update_release(
            &self,
            release_id: u64,
            changes: ReleaseUpdate,
        ) -> impl Future<Output = Result<Release, Error>> + Send;

        fn delete_release(&self, release_id: u64) -> impl Future<Output = Result<(), Error>> + Send;
    }
}

/// Asset upload and retrieval exposed to the HTTP layer.
pub trait AssetManager: Send + Sync + 'static {
    /// Store the uploaded bytes and attach the asset to its release.
    fn upload_asset(
        &self,
        release_id: u64,
        upload: AssetUpload,
        content: ByteStream,
    ) -> impl Future<Output = Result<Asset, Error>> + Send;

    fn list_assets(&self, release_id: u64)
    -> impl Future<Output = Result<Vec<Asset>, Error>> + Send;

    /// Bytes stored for an asset, streamed from the blob store.
    fn asset_content(&self, asset_id: u64)
    -> impl Future<Output = Result<ByteStream, Error>> + Send;
}

#[cfg(test)]
mockall::mock! {
    pub AssetManager {}

    impl Clone for AssetManager {
        fn clone(&self) -> Self;
    }

    impl AssetManager for AssetManager {
        fn upload_asset(
            &self,
            release_id: u64,
            upload: AssetUpload,
            content: ByteStream,
        ) -> impl Future<Output = Result<Asset, Error>> + Send;

        fn list_assets(&self, release_id: u64)
        -> impl Future<Output = Result<Vec<Asset>, Error>> + Send;

        fn asset_content(&self, asset_id: u64)
        -> impl Future<Output = Result<ByteStream, Error>> + Send;
    }
}

/// In-memory source of truth for releases.
///
/// Every method is atomic with respect to the others.
pub trait ReleaseStore: Send + Sync + 'static {
    fn insert_release(&self, release: Release) -> impl Future<Output = ()> + Send;

    fn find_release(&self, release_id: u64) -> impl Future<Output = Option<Release>> + Send;

    /// All releases, in insertion order.
    fn list_releases(&self) -> impl Future<Output = Vec<Release>> + Send;

    /// Apply the changes in place and return the updated release.
    fn update_release(
        &self,
        release_id: u64,
        changes: ReleaseUpdate,
    ) -> impl Future<Output = Option<Release>> + Send;

    fn remove_release(&self, release_id: u64) -> impl Future<Output = Option<Release>> + Send;

    /// Append an asset to a release, `false` when the release doesn't exist.
    fn append_asset(&self, release_id: u64, asset: Asset) -> impl Future<Output = bool> + Send;
}

#[cfg(test)]
mockall::mock! {
    pub ReleaseStore {}

    impl Clone for ReleaseStore {
        fn clone(&self) -> Self;
    }

    impl ReleaseStore for ReleaseStore {
        fn insert_release(&self, release: Release) -> impl Future<Output = ()> + Send;
        fn find_release(&self, release_id: u64) -> impl Future<Output = Option<Release>> + Send;
        fn list_releases(&self) -> impl Future<Output = Vec<Release>> + Send;
        fn update_release(
            &self,
            release_id: u64,
            changes: ReleaseUpdate,
        ) -> impl Future<Output = Option<Release>> + Send;
        fn remove_release(&self, release_id: u64) -> impl Future<Output = Option<Release>> + Send;
        fn append_asset(&self, release_id: u64, asset: Asset) -> impl Future<Output = bool> + Send;
    }
}

/// Keeps the bytes of uploaded assets.
pub trait BlobStore: Send + Sync + 'static {
    fn put(
        &self,
        key: u64,
        content: ByteStream,
    ) -> impl Future<Output = anyhow::Result<StoredBlob>> + Send;

    /// Stream a complete blob back, `None` if nothing was stored under that key.
    fn read(&self, key: u64) -> impl Future<Output = anyhow::Result<Option<ByteStream>>> + Send;

    /// URL under which the blob is served.
    fn resolve_url(&self, key: u64) -> String;
}

#[cfg(test)]
mockall::mock! {
    pub BlobStore {}

    impl Clone for BlobStore {
        fn clone(&self) -> Self;
    }

    impl BlobStore for BlobStore {
        fn put(
            &self,
            key: u64,
            content: ByteStream,
        ) -> impl Future<Output = anyhow::Result<StoredBlob>> + Send;
        fn read(&self, key: u64) -> impl Future<Output = anyhow::Result<Option<ByteStream>>> + Send;
        fn resolve_url(&self, key: u64) -> String;
    }
}

/// Hands out identifiers that are never reused during the process lifetime.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> u64;
}

#[cfg(test)]
mockall::mock! {
    pub IdGenerator {}

    impl Clone for IdGenerator {
        fn clone(&self) -> Self;
    }

    impl IdGenerator for IdGenerator {
        fn next_id(&self) -> u64;
    }
}

pub trait Clock: Send + Sync + 'static {
    fn now() -> DateTime<Utc>;
}

impl Clock for chrono::Utc {
    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

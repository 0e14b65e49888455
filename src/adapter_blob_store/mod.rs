use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::domain::entity::StoredBlob;
use crate::domain::prelude::ByteStream;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory in which the temporary blob directory gets created.
    parent_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            parent_dir: crate::maybe_env("BLOB_STORE_PARENT_DIR").map(PathBuf::from),
        })
    }

    #[cfg(test)]
    pub(crate) fn parent_dir(&self) -> Option<&std::path::Path> {
        self.parent_dir.as_deref()
    }

    pub fn build(self, public_url: Arc<str>) -> anyhow::Result<TempDirBlobStore> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("mock-github-");
        let directory = match self.parent_dir {
            Some(parent) => builder
                .tempdir_in(&parent)
                .with_context(|| format!("unable to create blob directory in {parent:?}"))?,
            None => builder
                .tempdir()
                .context("unable to create blob directory")?,
        };
        tracing::info!(path = ?directory.path(), "blob directory created");
        Ok(TempDirBlobStore {
            public_url,
            directory: Arc::new(directory),
        })
    }
}

/// Stores uploaded assets as files named after their key.
///
/// The directory is removed once the last clone is dropped.
#[derive(Clone, Debug)]
pub struct TempDirBlobStore {
    public_url: Arc<str>,
    directory: Arc<tempfile::TempDir>,
}

impl TempDirBlobStore {
    fn path(&self, key: u64) -> PathBuf {
        self.directory.path().join(key.to_string())
    }

    // bytes land in `{key}.part` and only get their final name once complete
    fn partial_path(&self, key: u64) -> PathBuf {
        self.directory.path().join(format!("{key}.part"))
    }
}

async fn write_content(path: &std::path::Path, mut content: ByteStream) -> anyhow::Result<u64> {
    use futures::StreamExt;
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .with_context(|| format!("unable to create blob file {path:?}"))?;

    let mut size = 0u64;
    while let Some(chunk) = content.next().await {
        let chunk = chunk.context("unable to read uploaded content")?;
        file.write_all(&chunk)
            .await
            .context("unable to write blob content")?;
        size += chunk.len() as u64;
    }
    file.flush().await.context("unable to flush blob content")?;
    Ok(size)
}

impl crate::domain::prelude::BlobStore for TempDirBlobStore {
    #[tracing::instrument(skip(self, content), err(Debug))]
    async fn put(&self, key: u64, content: ByteStream) -> anyhow::Result<StoredBlob> {
        let partial = self.partial_path(key);
        let size = match write_content(&partial, content).await {
            Ok(size) => size,
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    tracing::warn!(
                        error = ?cleanup,
                        path = ?partial,
                        "unable to remove partial blob"
                    );
                }
                return Err(err);
            }
        };

        let path = self.path(key);
        tokio::fs::rename(&partial, &path)
            .await
            .with_context(|| format!("unable to move blob to {path:?}"))?;
        tracing::debug!(size, "blob stored");

        Ok(StoredBlob { path, size })
    }

    async fn read(&self, key: u64) -> anyhow::Result<Option<ByteStream>> {
        use futures::StreamExt;

        match tokio::fs::File::open(self.path(key)).await {
            Ok(file) => Ok(Some(tokio_util::io::ReaderStream::new(file).boxed())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("unable to open blob {key}")),
        }
    }

    fn resolve_url(&self, key: u64) -> String {
        format!("{}/static/{key}", self.public_url)
    }
}

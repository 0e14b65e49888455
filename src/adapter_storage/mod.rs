use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::{Asset, Release, ReleaseUpdate};

/// Release registry kept in memory for the lifetime of the process.
///
/// Listing follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(Arc<RwLock<Vec<Release>>>);

impl crate::domain::prelude::ReleaseStore for MemoryStorage {
    async fn insert_release(&self, release: Release) {
        self.0.write().await.push(release);
    }

    async fn find_release(&self, release_id: u64) -> Option<Release> {
        self.0
            .read()
            .await
            .iter()
            .find(|release| release.id == release_id)
            .cloned()
    }

    async fn list_releases(&self) -> Vec<Release> {
        self.0.read().await.clone()
    }

    async fn update_release(&self, release_id: u64, changes: ReleaseUpdate) -> Option<Release> {
        let mut releases = self.0.write().await;
        let release = releases
            .iter_mut()
            .find(|release| release.id == release_id)?;
        changes.apply(release);
        Some(release.clone())
    }

    async fn remove_release(&self, release_id: u64) -> Option<Release> {
        let mut releases = self.0.write().await;
        let index = releases
            .iter()
            .position(|release| release.id == release_id)?;
        Some(releases.remove(index))
    }

    async fn append_asset(&self, release_id: u64, asset: Asset) -> bool {
        let mut releases = self.0.write().await;
        match releases
            .iter_mut()
            .find(|release| release.id == release_id)
        {
            Some(release) => {
                release.assets.push(asset);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::entity::{Asset, Release, ReleaseUpdate};
    use crate::domain::prelude::ReleaseStore;

    fn release(id: u64, tag_name: &str) -> Release {
        Release {
            id,
            tag_name: tag_name.into(),
            target_commitish: "main".into(),
            draft: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn should_list_in_insertion_order() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(3, "v3")).await;
        storage.insert_release(release(1, "v1")).await;
        storage.insert_release(release(2, "v2")).await;
        let ids: Vec<_> = storage
            .list_releases()
            .await
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn should_insert_and_find_release() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(1, "v1")).await;
        let found = storage.find_release(1).await.unwrap();
        assert_eq!(found.tag_name, "v1");
        assert!(storage.find_release(2).await.is_none());
    }

    #[tokio::test]
    async fn should_remove_only_once() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(1, "v1")).await;
        storage.insert_release(release(2, "v2")).await;
        assert_eq!(storage.remove_release(1).await.unwrap().id, 1);
        assert!(storage.remove_release(1).await.is_none());
        assert!(storage.find_release(1).await.is_none());
        assert_eq!(storage.list_releases().await.len(), 1);
    }

    #[tokio::test]
    async fn should_update_in_place() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(1, "v1")).await;
        let updated = storage
            .update_release(
                1,
                ReleaseUpdate {
                    draft: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.draft);
        assert_eq!(updated.tag_name, "v1");
        assert!(!storage.find_release(1).await.unwrap().draft);
        assert!(
            storage
                .update_release(2, ReleaseUpdate::default())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn should_append_assets_in_order() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(1, "v1")).await;
        for id in [10, 11] {
            let asset = Asset {
                id,
                ..Default::default()
            };
            assert!(storage.append_asset(1, asset).await);
        }
        assert!(!storage.append_asset(2, Asset::default()).await);
        let assets: Vec<_> = storage
            .find_release(1)
            .await
            .unwrap()
            .assets
            .into_iter()
            .map(|asset| asset.id)
            .collect();
        assert_eq!(assets, vec![10, 11]);
    }

    #[tokio::test]
    async fn should_not_lose_concurrent_appends() {
        let storage = super::MemoryStorage::default();
        storage.insert_release(release(1, "v1")).await;
        let handles: Vec<_> = (0..32u64)
            .map(|id| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .append_asset(
                            1,
                            Asset {
                                id,
                                ..Default::default()
                            },
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(storage.find_release(1).await.unwrap().assets.len(), 32);
    }
}

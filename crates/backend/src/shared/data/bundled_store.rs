use async_trait::async_trait;
use contracts::domain::catalogue::{bundled_document, CatalogueDocument};
use contracts::domain::common::IdAllocator;

use super::{CatalogueStore, Snapshot, StoreError};
use crate::shared::config::StorageKind;

/// Встроенный снимок каталога, только чтение
#[derive(Default)]
pub struct BundledStore;

impl BundledStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CatalogueStore for BundledStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Bundled
    }

    fn id_allocator(&self) -> IdAllocator {
        IdAllocator::Sequential
    }

    async fn read(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot::unversioned(bundled_document()))
    }

    async fn write(
        &self,
        _document: &CatalogueDocument,
        _revision: Option<&str>,
        _message: &str,
    ) -> Result<Option<String>, StoreError> {
        Err(StoreError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_snapshot_and_refuses_writes() {
        let store = BundledStore::new();
        let snapshot = store.read().await.unwrap();
        assert_eq!(snapshot.document, bundled_document());
        assert!(matches!(
            store.write(&snapshot.document, None, "x").await,
            Err(StoreError::ReadOnly)
        ));
    }
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use contracts::domain::catalogue::{bundled_document, CatalogueDocument};
use contracts::domain::common::IdAllocator;

use super::{CatalogueStore, Snapshot, StoreError};
use crate::shared::config::StorageKind;

/// Каталог в локальном JSON-файле.
///
/// Запись атомарна (временный файл + rename), но межпроцессной блокировки нет:
/// при параллельной записи из нескольких процессов побеждает последняя.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Если файла ещё нет, создать его из встроенного снимка
    pub async fn ensure_initialized(&self) -> Result<(), StoreError> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?
        {
            return Ok(());
        }

        tracing::warn!(
            "Catalogue file {} not found, seeding it from the bundled snapshot",
            self.path.display()
        );
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        self.replace_contents(&bundled_document()).await
    }

    async fn replace_contents(&self, document: &CatalogueDocument) -> Result<(), StoreError> {
        let text = document.to_pretty_json()?;
        let tmp_path = self.tmp_path();

        tokio::fs::write(&tmp_path, text.as_bytes())
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&self.path, e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalogue.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CatalogueStore for FileStore {
    fn kind(&self) -> StorageKind {
        StorageKind::File
    }

    fn id_allocator(&self) -> IdAllocator {
        IdAllocator::Sequential
    }

    async fn read(&self) -> Result<Snapshot, StoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        let document = CatalogueDocument::from_json(&text)?;
        Ok(Snapshot::unversioned(document))
    }

    async fn write(
        &self,
        document: &CatalogueDocument,
        _revision: Option<&str>,
        _message: &str,
    ) -> Result<Option<String>, StoreError> {
        self.replace_contents(document).await?;
        tracing::debug!("Catalogue file {} updated", self.path.display());
        Ok(None)
    }
}

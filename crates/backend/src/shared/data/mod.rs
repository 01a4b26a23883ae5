//! Хранилища каталога.
//!
//! Все варианты реализуют один трейт [`CatalogueStore`] и выбираются
//! конфигурацией (`storage.kind`).

pub mod bundled_store;
pub mod content_codec;
pub mod file_store;
pub mod github_store;

use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::catalogue::CatalogueDocument;
use contracts::domain::common::IdAllocator;
use thiserror::Error;

use crate::shared::config::{resolve_path, Config, StorageKind};

pub use bundled_store::BundledStore;
pub use file_store::FileStore;
pub use github_store::GithubStore;

/// Ошибки хранилища
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalogue document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote request failed: {0}")]
    Transport(String),

    #[error("Remote returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Remote content could not be decoded: {0}")]
    Encoding(String),

    /// Документ был изменён третьей стороной после чтения
    #[error("Catalogue was changed by someone else (stale revision): {0}")]
    Conflict(String),

    #[error("Catalogue backend is read-only")]
    ReadOnly,
}

impl StoreError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Прочитанный документ и его ревизия (только у версионируемого хранилища)
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub document: CatalogueDocument,
    pub revision: Option<String>,
}

impl Snapshot {
    pub fn unversioned(document: CatalogueDocument) -> Self {
        Self {
            document,
            revision: None,
        }
    }
}

/// Capability interface shared by every catalogue backend
#[async_trait]
pub trait CatalogueStore: Send + Sync {
    fn kind(&self) -> StorageKind;

    /// Как выдавать id новым записям
    fn id_allocator(&self) -> IdAllocator;

    async fn read(&self) -> Result<Snapshot, StoreError>;

    /// Записать документ. `revision`: ревизия, полученная при чтении;
    /// версионируемое хранилище отклоняет запись с устаревшей ревизией
    /// ошибкой [`StoreError::Conflict`]. Возвращает новую ревизию.
    async fn write(
        &self,
        document: &CatalogueDocument,
        revision: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, StoreError>;
}

/// Создать хранилище по конфигурации
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn CatalogueStore>> {
    let store: Arc<dyn CatalogueStore> = match config.storage.kind {
        StorageKind::File => {
            let path = resolve_path(&config.storage.path)?;
            let store = FileStore::new(path);
            store.ensure_initialized().await?;
            tracing::info!("Catalogue file: {}", store.path().display());
            Arc::new(store)
        }
        StorageKind::Github => {
            config.github.ensure_complete()?;
            let token = config.github.token()?;
            Arc::new(GithubStore::new(&config.github, token)?)
        }
        StorageKind::Bundled => Arc::new(BundledStore::new()),
    };
    tracing::info!("Catalogue storage: {:?}", store.kind());
    Ok(store)
}

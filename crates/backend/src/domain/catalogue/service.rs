use std::sync::Arc;

use contracts::domain::a001_category::aggregate::{Category, CreateCategoryDto};
use contracts::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use contracts::domain::catalogue::CatalogueDocument;
use contracts::domain::common::{CatalogueError, IdAllocator};
use tokio::sync::Mutex;

use crate::shared::api_error::ApiError;
use crate::shared::data::CatalogueStore;

/// Операции над каталогом поверх выбранного хранилища.
///
/// Каждое изменение это read → mutate → write целиком. Внутри процесса
/// этот участок сериализован мьютексом; между процессами защищает только
/// ревизия версионируемого хранилища.
pub struct CatalogueService {
    store: Arc<dyn CatalogueStore>,
    write_lock: Mutex<()>,
}

impl CatalogueService {
    pub fn new(store: Arc<dyn CatalogueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn get_document(&self) -> Result<CatalogueDocument, ApiError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot.document)
    }

    pub async fn add_site(&self, dto: CreateSiteDto) -> Result<Site, ApiError> {
        // fail fast on missing fields before touching storage
        let name = dto.validate()?.name;
        let message = format!("Add site: {}", name);
        let site = self
            .mutate(&message, |doc, allocator, now| {
                doc.add_site(&dto, allocator, now)
            })
            .await?;
        tracing::info!("Site {} \"{}\" added to category {}", site.id, site.name, site.category_id);
        Ok(site)
    }

    pub async fn update_site(&self, id: i64, dto: UpdateSiteDto) -> Result<Site, ApiError> {
        let message = format!("Update site #{}", id);
        let site = self
            .mutate(&message, |doc, _, _| doc.update_site(id, &dto))
            .await?;
        tracing::info!("Site {} \"{}\" updated", site.id, site.name);
        Ok(site)
    }

    pub async fn delete_site(&self, id: i64) -> Result<Site, ApiError> {
        let message = format!("Delete site #{}", id);
        let site = self
            .mutate(&message, |doc, _, _| doc.remove_site(id))
            .await?;
        tracing::info!("Site {} \"{}\" deleted", site.id, site.name);
        Ok(site)
    }

    pub async fn add_category(&self, dto: CreateCategoryDto) -> Result<Category, ApiError> {
        let (name, _) = dto.validate()?;
        let message = format!("Add category: {}", name);
        let category = self
            .mutate(&message, |doc, allocator, now| {
                doc.add_category(&dto, allocator, now)
            })
            .await?;
        tracing::info!("Category {} \"{}\" added", category.id, category.name);
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<Category, ApiError> {
        let message = format!("Delete category #{}", id);
        let category = self
            .mutate(&message, |doc, _, _| doc.remove_category(id))
            .await?;
        tracing::info!("Category {} \"{}\" deleted", category.id, category.name);
        Ok(category)
    }

    /// Прочитать документ, применить изменение и записать обратно с прочитанной ревизией.
    /// При ошибке изменения ничего не записывается.
    async fn mutate<T, F>(&self, message: &str, change: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut CatalogueDocument, IdAllocator, i64) -> Result<T, CatalogueError>,
    {
        let _guard = self.write_lock.lock().await;

        let snapshot = self.store.read().await?;
        let mut document = snapshot.document;
        let now_millis = chrono::Utc::now().timestamp_millis();

        let value = change(&mut document, self.store.id_allocator(), now_millis)?;

        let new_revision = self
            .store
            .write(&document, snapshot.revision.as_deref(), message)
            .await?;
        if let Some(revision) = new_revision {
            tracing::debug!("Catalogue revision is now {}", revision);
        }
        Ok(value)
    }
}

//! Синхронизация клиента с каталогом на сервере.
//!
//! После каждой успешной мутации документ перечитывается целиком: коллекции
//! на клиенте никогда не правятся оптимистично, id всегда серверные.
//! Исключение одно: локальная имитация удаления категории для удалённого
//! хранилища (`SyncOptions::local_delete_fallback`), она не сохраняется
//! и пропадает после перезагрузки.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a001_category::aggregate::{Category, CreateCategoryDto};
use contracts::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use contracts::domain::catalogue::{bundled_document, CatalogueDocument};
use contracts::shared::api_response::ApiResponse;

/// Why a call to the API did not produce a success envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// Запрос не дошёл до сервера
    Network(String),
    /// Сервер ответил ошибкой
    Rejected { status: u16, error: String },
    /// Ответ не удалось разобрать
    Decode(String),
}

impl ApiFailure {
    /// Transport problems, 5xx and revision conflicts; not 400/404
    pub fn is_server_side(&self) -> bool {
        match self {
            ApiFailure::Network(_) => true,
            ApiFailure::Rejected { status, .. } => *status >= 500 || *status == 409,
            ApiFailure::Decode(_) => false,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Network(e) => write!(f, "Network error: {}", e),
            ApiFailure::Rejected { error, .. } => write!(f, "{}", error),
            ApiFailure::Decode(e) => write!(f, "Unexpected server response: {}", e),
        }
    }
}

/// CRUD-операции каталога. `Ok` только для конверта с `success: true`.
#[async_trait(?Send)]
pub trait CatalogueApi {
    async fn fetch_document(&self) -> Result<CatalogueDocument, ApiFailure>;
    async fn add_site(&self, dto: &CreateSiteDto) -> Result<ApiResponse<Site>, ApiFailure>;
    async fn update_site(
        &self,
        id: i64,
        dto: &UpdateSiteDto,
    ) -> Result<ApiResponse<Site>, ApiFailure>;
    async fn delete_site(&self, id: i64) -> Result<ApiResponse<Site>, ApiFailure>;
    async fn add_category(
        &self,
        dto: &CreateCategoryDto,
    ) -> Result<ApiResponse<Category>, ApiFailure>;
    async fn delete_category(&self, id: i64) -> Result<ApiResponse<Category>, ApiFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Куда хук складывает состояние (сигналы Leptos в UI, память в тестах)
pub trait CatalogueSink {
    fn set_state(&self, state: SyncState);
    fn set_document(&self, document: CatalogueDocument);
    fn document(&self) -> Option<CatalogueDocument>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Remote-versioned backend: simulate a failed delete-category in memory
    pub local_delete_fallback: bool,
}

/// Результат мутации для UI; никогда не паникует и не возвращает Err
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
    /// Изменение есть только в памяти клиента
    pub is_local: bool,
}

impl<T> MutationOutcome<T> {
    fn from_response(response: ApiResponse<T>) -> Self {
        Self {
            success: response.success,
            error: response.error,
            message: response.message,
            data: response.data,
            is_local: false,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            is_local: false,
        }
    }

    fn local(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
            is_local: true,
        }
    }
}

/// Клиентский хук каталога
pub struct CatalogueSync<A, S> {
    api: Arc<A>,
    sink: S,
    options: SyncOptions,
}

impl<A, S: Clone> Clone for CatalogueSync<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            sink: self.sink.clone(),
            options: self.options,
        }
    }
}

impl<A: CatalogueApi, S: CatalogueSink> CatalogueSync<A, S> {
    pub fn new(api: A, sink: S, options: SyncOptions) -> Self {
        Self {
            api: Arc::new(api),
            sink,
            options,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Последний полученный документ или встроенный снимок, если сервер недоступен
    pub fn document_or_bundled(&self) -> CatalogueDocument {
        self.sink.document().unwrap_or_else(bundled_document)
    }

    /// Get-document. On failure the last good document is kept.
    pub async fn refresh(&self) -> Result<(), ApiFailure> {
        self.sink.set_state(SyncState::Loading);
        match self.api.fetch_document().await {
            Ok(document) => {
                self.sink.set_document(document);
                self.sink.set_state(SyncState::Ready);
                Ok(())
            }
            Err(failure) => {
                log::warn!("Failed to load catalogue: {}", failure);
                self.sink.set_state(SyncState::Error(failure.to_string()));
                Err(failure)
            }
        }
    }

    pub async fn add_site(&self, dto: CreateSiteDto) -> MutationOutcome<Site> {
        self.sink.set_state(SyncState::Loading);
        let result = self.api.add_site(&dto).await;
        self.settle(result).await
    }

    pub async fn update_site(&self, id: i64, dto: UpdateSiteDto) -> MutationOutcome<Site> {
        self.sink.set_state(SyncState::Loading);
        let result = self.api.update_site(id, &dto).await;
        self.settle(result).await
    }

    pub async fn delete_site(&self, id: i64) -> MutationOutcome<Site> {
        self.sink.set_state(SyncState::Loading);
        let result = self.api.delete_site(id).await;
        self.settle(result).await
    }

    pub async fn add_category(&self, dto: CreateCategoryDto) -> MutationOutcome<Category> {
        self.sink.set_state(SyncState::Loading);
        let result = self.api.add_category(&dto).await;
        self.settle(result).await
    }

    pub async fn delete_category(&self, id: i64) -> MutationOutcome<Category> {
        self.sink.set_state(SyncState::Loading);
        match self.api.delete_category(id).await {
            Err(failure) if self.options.local_delete_fallback && failure.is_server_side() => {
                self.delete_category_locally(id, failure)
            }
            result => self.settle(result).await,
        }
    }

    /// Успех: перечитать документ. Ошибка: состояние Error, документ прежний.
    async fn settle<T>(
        &self,
        result: Result<ApiResponse<T>, ApiFailure>,
    ) -> MutationOutcome<T> {
        match result {
            Ok(response) => {
                let outcome = MutationOutcome::from_response(response);
                // outcome stays successful even if the refetch fails
                let _ = self.refresh().await;
                outcome
            }
            Err(failure) => {
                self.sink.set_state(SyncState::Error(failure.to_string()));
                MutationOutcome::failed(failure.to_string())
            }
        }
    }

    fn delete_category_locally(&self, id: i64, failure: ApiFailure) -> MutationOutcome<Category> {
        let Some(mut document) = self.sink.document() else {
            self.sink.set_state(SyncState::Error(failure.to_string()));
            return MutationOutcome::failed(failure.to_string());
        };
        match document.remove_category_cascade(id) {
            Some(category) => {
                log::warn!(
                    "Delete category {} failed on the server ({}); removed locally only",
                    id,
                    failure
                );
                self.sink.set_document(document);
                self.sink.set_state(SyncState::Ready);
                let message = format!(
                    "Category \"{}\" removed locally (not saved, lost on reload)",
                    category.name
                );
                MutationOutcome::local(category, message)
            }
            None => {
                self.sink.set_state(SyncState::Error(failure.to_string()));
                MutationOutcome::failed(failure.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeApi {
        document: RefCell<CatalogueDocument>,
        fetches: RefCell<usize>,
        fail_fetch: RefCell<bool>,
        delete_category_failures: RefCell<VecDeque<ApiFailure>>,
    }

    impl FakeApi {
        fn with(document: CatalogueDocument) -> Self {
            Self {
                document: RefCell::new(document),
                ..Default::default()
            }
        }
    }

    fn rejected(status: u16, error: &str) -> ApiFailure {
        ApiFailure::Rejected {
            status,
            error: error.to_string(),
        }
    }

    fn ok<T>(data: T, message: String) -> Result<ApiResponse<T>, ApiFailure> {
        Ok(ApiResponse::ok(data).with_message(message))
    }

    #[async_trait(?Send)]
    impl CatalogueApi for FakeApi {
        async fn fetch_document(&self) -> Result<CatalogueDocument, ApiFailure> {
            *self.fetches.borrow_mut() += 1;
            if *self.fail_fetch.borrow() {
                return Err(ApiFailure::Network("connection refused".into()));
            }
            Ok(self.document.borrow().clone())
        }

        async fn add_site(&self, dto: &CreateSiteDto) -> Result<ApiResponse<Site>, ApiFailure> {
            let mut doc = self.document.borrow_mut();
            match doc.add_site(dto, contracts::domain::common::IdAllocator::Sequential, 0) {
                Ok(site) => {
                    let message = format!("Site \"{}\" added", site.name);
                    ok(site, message)
                }
                Err(e) => Err(rejected(400, &e.to_string())),
            }
        }

        async fn update_site(
            &self,
            id: i64,
            dto: &UpdateSiteDto,
        ) -> Result<ApiResponse<Site>, ApiFailure> {
            let mut doc = self.document.borrow_mut();
            match doc.update_site(id, dto) {
                Ok(site) => ok(site, "updated".into()),
                Err(e) if e.is_not_found() => Err(rejected(404, &e.to_string())),
                Err(e) => Err(rejected(400, &e.to_string())),
            }
        }

        async fn delete_site(&self, id: i64) -> Result<ApiResponse<Site>, ApiFailure> {
            let mut doc = self.document.borrow_mut();
            match doc.remove_site(id) {
                Ok(site) => ok(site, "deleted".into()),
                Err(e) => Err(rejected(404, &e.to_string())),
            }
        }

        async fn add_category(
            &self,
            dto: &CreateCategoryDto,
        ) -> Result<ApiResponse<Category>, ApiFailure> {
            let mut doc = self.document.borrow_mut();
            match doc.add_category(dto, contracts::domain::common::IdAllocator::Sequential, 0) {
                Ok(category) => ok(category, "added".into()),
                Err(e) => Err(rejected(400, &e.to_string())),
            }
        }

        async fn delete_category(&self, id: i64) -> Result<ApiResponse<Category>, ApiFailure> {
            if let Some(failure) = self.delete_category_failures.borrow_mut().pop_front() {
                return Err(failure);
            }
            let mut doc = self.document.borrow_mut();
            match doc.remove_category(id) {
                Ok(category) => ok(category, "deleted".into()),
                Err(e) if e.is_not_found() => Err(rejected(404, &e.to_string())),
                Err(e) => Err(rejected(400, &e.to_string())),
            }
        }
    }

    #[derive(Clone, Default)]
    struct MemorySink {
        states: Rc<RefCell<Vec<SyncState>>>,
        document: Rc<RefCell<Option<CatalogueDocument>>>,
    }

    impl MemorySink {
        fn last_state(&self) -> SyncState {
            self.states.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl CatalogueSink for MemorySink {
        fn set_state(&self, state: SyncState) {
            self.states.borrow_mut().push(state);
        }

        fn set_document(&self, document: CatalogueDocument) {
            *self.document.borrow_mut() = Some(document);
        }

        fn document(&self) -> Option<CatalogueDocument> {
            self.document.borrow().clone()
        }
    }

    fn tools_document() -> CatalogueDocument {
        CatalogueDocument {
            categories: vec![Category {
                id: 1,
                name: "Tools".into(),
                icon: "🔧".into(),
            }],
            sites: vec![Site {
                id: 1,
                name: "Example".into(),
                url: "https://example.com".into(),
                description: String::new(),
                category_id: 1,
                icon: "/icons/default.svg".into(),
            }],
        }
    }

    fn hook(api: FakeApi, options: SyncOptions) -> (CatalogueSync<FakeApi, MemorySink>, MemorySink) {
        let sink = MemorySink::default();
        (CatalogueSync::new(api, sink.clone(), options), sink)
    }

    #[tokio::test]
    async fn test_refresh_moves_to_ready() {
        let (sync, sink) = hook(FakeApi::with(tools_document()), SyncOptions::default());
        sync.refresh().await.unwrap();
        assert_eq!(
            *sink.states.borrow(),
            vec![SyncState::Loading, SyncState::Ready]
        );
        assert_eq!(sink.document(), Some(tools_document()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back_to_bundled() {
        let api = FakeApi::default();
        *api.fail_fetch.borrow_mut() = true;
        let (sync, sink) = hook(api, SyncOptions::default());

        assert!(sync.refresh().await.is_err());
        assert!(matches!(sink.last_state(), SyncState::Error(_)));
        assert_eq!(sync.document_or_bundled(), bundled_document());
    }

    #[tokio::test]
    async fn test_successful_mutation_refetches() {
        let (sync, sink) = hook(FakeApi::with(tools_document()), SyncOptions::default());
        sync.refresh().await.unwrap();

        let outcome = sync
            .add_site(CreateSiteDto {
                name: Some("Docs".into()),
                url: Some("https://docs.rs".into()),
                category_id: Some(1),
                ..Default::default()
            })
            .await;

        assert!(outcome.success);
        assert!(!outcome.is_local);
        assert_eq!(outcome.data.as_ref().map(|s| s.id), Some(2));
        assert_eq!(outcome.message.as_deref(), Some("Site \"Docs\" added"));
        assert_eq!(*sync.api.fetches.borrow(), 2);
        assert_eq!(sink.document().unwrap().sites.len(), 2);
        assert_eq!(sink.last_state(), SyncState::Ready);
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_last_document() {
        let (sync, sink) = hook(FakeApi::with(tools_document()), SyncOptions::default());
        sync.refresh().await.unwrap();

        let outcome = sync.delete_site(42).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("42"));
        assert!(matches!(sink.last_state(), SyncState::Error(_)));
        assert_eq!(sink.document(), Some(tools_document()));
        assert_eq!(*sync.api.fetches.borrow(), 1);
    }

    #[tokio::test]
    async fn test_update_site_merges_and_refetches() {
        let (sync, sink) = hook(FakeApi::with(tools_document()), SyncOptions::default());
        sync.refresh().await.unwrap();

        let outcome = sync
            .update_site(
                1,
                UpdateSiteDto {
                    description: Some("Reference site".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(outcome.success);
        let site = &sink.document().unwrap().sites[0];
        assert_eq!(site.description, "Reference site");
        assert_eq!(site.url, "https://example.com");
        assert_eq!(*sync.api.fetches.borrow(), 2);

        let missing = sync.update_site(7, UpdateSiteDto::default()).await;
        assert!(!missing.success);
        assert!(!missing.is_local);
    }

    #[tokio::test]
    async fn test_referential_rejection_is_not_simulated() {
        let options = SyncOptions {
            local_delete_fallback: true,
        };
        let (sync, sink) = hook(FakeApi::with(tools_document()), options);
        sync.refresh().await.unwrap();

        let outcome = sync.delete_category(1).await;
        assert!(!outcome.success);
        assert!(!outcome.is_local);
        assert_eq!(sink.document(), Some(tools_document()));
    }

    #[tokio::test]
    async fn test_remote_delete_category_failure_is_simulated_locally() {
        let api = FakeApi::with(tools_document());
        api.delete_category_failures
            .borrow_mut()
            .push_back(rejected(409, "sha does not match"));
        let options = SyncOptions {
            local_delete_fallback: true,
        };
        let (sync, sink) = hook(api, options);
        sync.refresh().await.unwrap();

        let outcome = sync.delete_category(1).await;
        assert!(outcome.success);
        assert!(outcome.is_local);
        assert_eq!(outcome.data.map(|c| c.id), Some(1));

        let local = sink.document().unwrap();
        assert!(local.categories.is_empty());
        assert!(local.sites.is_empty());
        // nothing reached the server
        assert_eq!(sync.api.document.borrow().categories.len(), 1);
        assert_eq!(sink.last_state(), SyncState::Ready);
    }

    #[tokio::test]
    async fn test_no_local_simulation_without_option() {
        let api = FakeApi::with(tools_document());
        api.delete_category_failures
            .borrow_mut()
            .push_back(ApiFailure::Network("offline".into()));
        let (sync, sink) = hook(api, SyncOptions::default());
        sync.refresh().await.unwrap();

        let outcome = sync.delete_category(1).await;
        assert!(!outcome.success);
        assert!(!outcome.is_local);
        assert_eq!(sink.document(), Some(tools_document()));
    }

    #[test]
    fn test_server_side_failures() {
        assert!(ApiFailure::Network("x".into()).is_server_side());
        assert!(rejected(500, "x").is_server_side());
        assert!(rejected(409, "x").is_server_side());
        assert!(!rejected(400, "x").is_server_side());
        assert!(!rejected(404, "x").is_server_side());
    }
}

use contracts::domain::catalogue::{bundled_document, CatalogueDocument};
use leptos::prelude::*;

use super::api::HttpCatalogueApi;
use super::sync::{CatalogueSink, CatalogueSync, SyncOptions, SyncState};
use crate::shared::api_utils::is_remote_backend;

/// Состояние хука в сигналах Leptos
#[derive(Clone, Copy)]
pub struct CatalogueSignals {
    pub state: RwSignal<SyncState>,
    pub document: RwSignal<Option<CatalogueDocument>>,
}

impl CatalogueSignals {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(SyncState::Idle),
            document: RwSignal::new(None),
        }
    }

    /// Reactive: last loaded document, bundled snapshot until the first load succeeds
    pub fn document_or_bundled(&self) -> CatalogueDocument {
        self.document.get().unwrap_or_else(bundled_document)
    }
}

impl Default for CatalogueSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogueSink for CatalogueSignals {
    fn set_state(&self, state: SyncState) {
        self.state.set(state);
    }

    fn set_document(&self, document: CatalogueDocument) {
        self.document.set(Some(document));
    }

    fn document(&self) -> Option<CatalogueDocument> {
        self.document.get_untracked()
    }
}

pub type CatalogueClient = CatalogueSync<HttpCatalogueApi, CatalogueSignals>;

/// Create the hook and start loading the catalogue
pub fn use_catalogue() -> CatalogueClient {
    let options = SyncOptions {
        local_delete_fallback: is_remote_backend(),
    };
    let client = CatalogueSync::new(HttpCatalogueApi::default(), CatalogueSignals::new(), options);

    let loader = client.clone();
    wasm_bindgen_futures::spawn_local(async move {
        // ошибка уже в state, UI покажет встроенный снимок
        let _ = loader.refresh().await;
    });

    client
}

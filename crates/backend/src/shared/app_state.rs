use std::sync::Arc;

use crate::domain::catalogue::CatalogueService;

/// Состояние, общее для всех обработчиков
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<CatalogueService>,
}

impl AppState {
    pub fn new(catalogue: CatalogueService) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
        }
    }
}

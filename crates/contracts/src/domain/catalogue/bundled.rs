//! Снимок каталога, встроенный в сборку.
//!
//! Служит read-only хранилищем, начальными данными для файлового хранилища
//! и запасным вариантом клиента, когда сервер недоступен.

use once_cell::sync::Lazy;

use super::document::CatalogueDocument;

/// Raw JSON of the bundled snapshot
pub const BUNDLED_CATALOGUE_JSON: &str = include_str!("../../../data/catalogue.json");

static BUNDLED: Lazy<CatalogueDocument> = Lazy::new(|| {
    CatalogueDocument::from_json(BUNDLED_CATALOGUE_JSON)
        .expect("bundled catalogue.json must be a valid catalogue document")
});

pub fn bundled_document() -> CatalogueDocument {
    BUNDLED.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_snapshot_is_consistent() {
        let doc = bundled_document();
        assert!(!doc.categories.is_empty());
        assert!(!doc.sites.is_empty());
        assert!(doc.integrity_issues().is_empty(), "{:?}", doc.integrity_issues());
    }
}

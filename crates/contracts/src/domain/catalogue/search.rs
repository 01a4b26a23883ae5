use crate::domain::a002_site::aggregate::Site;

use super::document::CatalogueDocument;

/// Фильтр списка сайтов: категория + поисковая строка.
///
/// Линейный проход без ранжирования; порядок документа сохраняется.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFilter {
    /// `None` или `Some(0)`: все категории
    pub category_id: Option<i64>,
    pub term: String,
}

impl SiteFilter {
    pub fn new(category_id: Option<i64>, term: impl Into<String>) -> Self {
        Self {
            category_id,
            term: term.into(),
        }
    }

    pub fn apply<'a>(&self, document: &'a CatalogueDocument) -> Vec<&'a Site> {
        let category = self.category_id.filter(|id| *id != 0);
        let term = self.term.trim().to_lowercase();

        document
            .sites
            .iter()
            .filter(|s| category.map_or(true, |id| s.category_id == id))
            .filter(|s| term.is_empty() || s.matches_term(&term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_category::aggregate::Category;

    fn doc() -> CatalogueDocument {
        let site = |id, name: &str, description: &str, category_id| Site {
            id,
            name: name.into(),
            url: format!("https://{}.example", id),
            description: description.into(),
            category_id,
            icon: "/icons/default.svg".into(),
        };
        CatalogueDocument {
            categories: vec![
                Category { id: 1, name: "Dev".into(), icon: "💻".into() },
                Category { id: 2, name: "阅读".into(), icon: "📚".into() },
            ],
            sites: vec![
                site(1, "GitHub", "Code hosting", 1),
                site(2, "Docs.rs", "Rust documentation", 1),
                site(3, "豆瓣读书", "书评与Rust无关", 2),
            ],
        }
    }

    fn ids(sites: Vec<&Site>) -> Vec<i64> {
        sites.into_iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        assert_eq!(ids(SiteFilter::default().apply(&doc())), vec![1, 2, 3]);
        assert_eq!(ids(SiteFilter::new(Some(0), "  ").apply(&doc())), vec![1, 2, 3]);
    }

    #[test]
    fn test_category_and_term_combine() {
        let d = doc();
        assert_eq!(ids(SiteFilter::new(Some(1), "").apply(&d)), vec![1, 2]);
        assert_eq!(ids(SiteFilter::new(None, "rust").apply(&d)), vec![2, 3]);
        assert_eq!(ids(SiteFilter::new(Some(2), "RUST").apply(&d)), vec![3]);
        assert_eq!(ids(SiteFilter::new(None, "读书").apply(&d)), vec![3]);
        assert!(SiteFilter::new(Some(1), "豆瓣").apply(&d).is_empty());
    }
}

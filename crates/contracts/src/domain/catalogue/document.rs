use serde::{Deserialize, Serialize};

use crate::domain::a001_category::aggregate::{Category, CreateCategoryDto};
use crate::domain::a002_site::aggregate::{CreateSiteDto, Site, UpdateSiteDto};
use crate::domain::common::{CatalogueError, IdAllocator};

/// Весь каталог: категории и сайты. Единица чтения/записи для любого хранилища.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl CatalogueDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Stable on-disk form: 2-space indentation plus a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn site(&self, id: i64) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    /// Количество сайтов, ссылающихся на категорию
    pub fn sites_in_category(&self, category_id: i64) -> usize {
        self.sites
            .iter()
            .filter(|s| s.category_id == category_id)
            .count()
    }

    pub fn add_site(
        &mut self,
        dto: &CreateSiteDto,
        allocator: IdAllocator,
        now_millis: i64,
    ) -> Result<Site, CatalogueError> {
        let new_site = dto.validate()?;
        self.require_category(new_site.category_id)?;

        let id = allocator.next_id(self.sites.iter().map(|s| s.id), now_millis)?;
        let site = new_site.with_id(id);
        self.sites.push(site.clone());
        Ok(site)
    }

    pub fn update_site(&mut self, id: i64, dto: &UpdateSiteDto) -> Result<Site, CatalogueError> {
        let index = self
            .sites
            .iter()
            .position(|s| s.id == id)
            .ok_or(CatalogueError::SiteNotFound(id))?;

        let mut updated = self.sites[index].clone();
        updated.apply(dto)?;
        if dto.category_id.is_some() {
            self.require_category(updated.category_id)?;
        }

        self.sites[index] = updated.clone();
        Ok(updated)
    }

    pub fn remove_site(&mut self, id: i64) -> Result<Site, CatalogueError> {
        let index = self
            .sites
            .iter()
            .position(|s| s.id == id)
            .ok_or(CatalogueError::SiteNotFound(id))?;
        Ok(self.sites.remove(index))
    }

    pub fn add_category(
        &mut self,
        dto: &CreateCategoryDto,
        allocator: IdAllocator,
        now_millis: i64,
    ) -> Result<Category, CatalogueError> {
        let (name, icon) = dto.validate()?;
        let id = allocator.next_id(self.categories.iter().map(|c| c.id), now_millis)?;
        let category = Category { id, name, icon };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Удаление категории с проверкой ссылочной целостности
    pub fn remove_category(&mut self, id: i64) -> Result<Category, CatalogueError> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(CatalogueError::CategoryNotFound(id))?;

        let site_count = self.sites_in_category(id);
        if site_count > 0 {
            return Err(CatalogueError::CategoryInUse { id, site_count });
        }

        Ok(self.categories.remove(index))
    }

    /// Удаление категории вместе со всеми её сайтами.
    ///
    /// Используется только клиентом для локальной (несохраняемой) имитации.
    pub fn remove_category_cascade(&mut self, id: i64) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        self.sites.retain(|s| s.category_id != id);
        Some(self.categories.remove(index))
    }

    /// Список нарушений инвариантов (дубли id, ссылки на несуществующие категории)
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut category_ids = std::collections::HashSet::new();
        for c in &self.categories {
            if !category_ids.insert(c.id) {
                issues.push(format!("duplicate category id {}", c.id));
            }
        }

        let mut site_ids = std::collections::HashSet::new();
        for s in &self.sites {
            if !site_ids.insert(s.id) {
                issues.push(format!("duplicate site id {}", s.id));
            }
            if !category_ids.contains(&s.category_id) {
                issues.push(format!(
                    "site {} references missing category {}",
                    s.id, s.category_id
                ));
            }
        }

        issues
    }

    fn require_category(&self, id: i64) -> Result<(), CatalogueError> {
        if self.category(id).is_some() {
            Ok(())
        } else {
            Err(CatalogueError::invalid(format!(
                "Category {} does not exist",
                id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_site::aggregate::DEFAULT_SITE_ICON;

    fn tools_only() -> CatalogueDocument {
        CatalogueDocument {
            categories: vec![Category {
                id: 1,
                name: "Tools".into(),
                icon: "🔧".into(),
            }],
            sites: vec![],
        }
    }

    fn example_dto() -> CreateSiteDto {
        CreateSiteDto {
            name: Some("Example".into()),
            url: Some("https://example.com".into()),
            category_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_referential_guard_scenario() {
        let mut doc = tools_only();

        let site = doc
            .add_site(&example_dto(), IdAllocator::Sequential, 0)
            .unwrap();
        assert_eq!(site.id, 1);
        assert_eq!(site.icon, DEFAULT_SITE_ICON);
        assert_eq!(site.description, "");

        let err = doc.remove_category(1).unwrap_err();
        assert_eq!(err, CatalogueError::CategoryInUse { id: 1, site_count: 1 });
        assert!(err.to_string().contains('1'));

        doc.remove_site(1).unwrap();
        let removed = doc.remove_category(1).unwrap();
        assert_eq!(removed.name, "Tools");
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn test_new_site_id_exceeds_existing() {
        let mut doc = tools_only();
        for _ in 0..3 {
            doc.add_site(&example_dto(), IdAllocator::Sequential, 0)
                .unwrap();
        }
        doc.remove_site(2).unwrap();
        let max_before = doc.sites.iter().map(|s| s.id).max().unwrap();
        let site = doc
            .add_site(&example_dto(), IdAllocator::Sequential, 0)
            .unwrap();
        assert!(site.id > max_before);
    }

    #[test]
    fn test_add_site_unknown_category() {
        let mut doc = tools_only();
        let dto = CreateSiteDto {
            category_id: Some(42),
            ..example_dto()
        };
        assert!(doc
            .add_site(&dto, IdAllocator::Sequential, 0)
            .unwrap_err()
            .is_validation());
        assert!(doc.sites.is_empty());
    }

    #[test]
    fn test_update_missing_site() {
        let mut doc = tools_only();
        assert_eq!(
            doc.update_site(999, &UpdateSiteDto::default()).unwrap_err(),
            CatalogueError::SiteNotFound(999)
        );
    }

    #[test]
    fn test_update_to_unknown_category_is_rejected() {
        let mut doc = tools_only();
        doc.add_site(&example_dto(), IdAllocator::Sequential, 0)
            .unwrap();
        let before = doc.clone();
        let result = doc.update_site(
            1,
            &UpdateSiteDto {
                category_id: Some(7),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_site_twice() {
        let mut doc = tools_only();
        doc.add_site(&example_dto(), IdAllocator::Sequential, 0)
            .unwrap();
        assert!(doc.remove_site(1).is_ok());
        assert_eq!(
            doc.remove_site(1).unwrap_err(),
            CatalogueError::SiteNotFound(1)
        );
    }

    #[test]
    fn test_cascade_removes_sites() {
        let mut doc = tools_only();
        doc.add_site(&example_dto(), IdAllocator::Sequential, 0)
            .unwrap();
        let removed = doc.remove_category_cascade(1);
        assert!(removed.is_some());
        assert!(doc.sites.is_empty());
        assert!(doc.remove_category_cascade(1).is_none());
    }

    #[test]
    fn test_pretty_json_round_trip_keeps_multibyte_text() {
        let mut doc = tools_only();
        doc.categories[0].name = "常用工具".into();
        doc.add_site(
            &CreateSiteDto {
                name: Some("知乎".into()),
                description: Some("中文问答社区 — Q&A 🇨🇳".into()),
                ..example_dto()
            },
            IdAllocator::Sequential,
            0,
        )
        .unwrap();

        let text = doc.to_pretty_json().unwrap();
        assert!(text.starts_with("{\n  \"categories\""));
        assert!(text.ends_with("}\n"));

        let back = CatalogueDocument::from_json(&text).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.sites[0].description.as_bytes(), doc.sites[0].description.as_bytes());
    }

    #[test]
    fn test_integrity_issues() {
        let mut doc = tools_only();
        assert!(doc.integrity_issues().is_empty());
        doc.sites.push(Site {
            id: 5,
            name: "Orphan".into(),
            url: "https://orphan.example".into(),
            description: String::new(),
            category_id: 9,
            icon: DEFAULT_SITE_ICON.into(),
        });
        doc.categories.push(doc.categories[0].clone());
        let issues = doc.integrity_issues();
        assert_eq!(issues.len(), 2);
    }
}

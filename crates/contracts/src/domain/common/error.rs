use thiserror::Error;

/// Нарушение правил каталога при изменении документа
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    Invalid(String),

    #[error("Site {0} not found")]
    SiteNotFound(i64),

    #[error("Category {0} not found")]
    CategoryNotFound(i64),

    #[error(
        "Cannot delete category: {site_count} site(s) still belong to it. Delete or move them first."
    )]
    CategoryInUse { id: i64, site_count: usize },
}

impl CatalogueError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Ошибка валидации входных данных (в отличие от "не найдено")
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::Invalid(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SiteNotFound(_) | Self::CategoryNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CatalogueError::MissingFields(vec!["name", "url"]).to_string(),
            "Missing required fields: name, url"
        );
        let in_use = CatalogueError::CategoryInUse { id: 3, site_count: 2 };
        assert!(in_use.to_string().contains("2 site(s)"));
        assert!(!in_use.is_validation());
        assert!(CatalogueError::SiteNotFound(1).is_not_found());
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::common::CatalogueError;

/// Максимальная длина названия категории (в символах)
pub const CATEGORY_NAME_MAX_CHARS: usize = 20;

// ============================================================================
// Aggregate
// ============================================================================

/// Категория сайтов
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Emoji или короткий символ
    pub icon: String,
}

// ============================================================================
// DTO
// ============================================================================

/// POST /api/categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl CreateCategoryDto {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            icon: Some(icon.into()),
        }
    }

    /// Проверка обязательных полей; возвращает (name, icon) без пробелов по краям
    pub fn validate(&self) -> Result<(String, String), CatalogueError> {
        let name = non_blank(self.name.as_deref());
        let icon = non_blank(self.icon.as_deref());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if icon.is_none() {
            missing.push("icon");
        }
        let (Some(name), Some(icon)) = (name, icon) else {
            return Err(CatalogueError::MissingFields(missing));
        };

        if name.chars().count() > CATEGORY_NAME_MAX_CHARS {
            return Err(CatalogueError::invalid(format!(
                "Category name must be at most {} characters",
                CATEGORY_NAME_MAX_CHARS
            )));
        }

        Ok((name.to_string(), icon.to_string()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

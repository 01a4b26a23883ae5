use serde::{Deserialize, Serialize};

use crate::domain::common::serde_helpers::deserialize_optional_id;
use crate::domain::common::CatalogueError;

/// Иконка по умолчанию для сайта без своей иконки
pub const DEFAULT_SITE_ICON: &str = "/icons/default.svg";

// ============================================================================
// Aggregate
// ============================================================================

/// Сайт в каталоге
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub category_id: i64,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_SITE_ICON.to_string()
}

impl Site {
    /// Применить частичное обновление.
    ///
    /// `name`, `url`, `icon` перезаписываются только непустыми значениями,
    /// `description` перезаписывается любым переданным значением, включая пустую строку.
    /// Проверка `category_id` на существование выполняется документом.
    pub fn apply(&mut self, dto: &UpdateSiteDto) -> Result<(), CatalogueError> {
        if let Some(url) = non_blank(dto.url.as_deref()) {
            validate_url(url)?;
            self.url = url.to_string();
        }
        if let Some(name) = non_blank(dto.name.as_deref()) {
            self.name = name.to_string();
        }
        if let Some(description) = &dto.description {
            self.description = description.clone();
        }
        if let Some(category_id) = dto.category_id {
            self.category_id = category_id;
        }
        if let Some(icon) = non_blank(dto.icon.as_deref()) {
            self.icon = icon.to_string();
        }
        Ok(())
    }

    /// Совпадает ли сайт с поисковой строкой (уже в нижнем регистре)
    pub fn matches_term(&self, term_lower: &str) -> bool {
        self.name.to_lowercase().contains(term_lower)
            || self.description.to_lowercase().contains(term_lower)
    }
}

// ============================================================================
// DTO
// ============================================================================

/// POST /api/sites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Проверенные данные нового сайта (без id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSite {
    pub name: String,
    pub url: String,
    pub description: String,
    pub category_id: i64,
    pub icon: String,
}

impl NewSite {
    pub fn with_id(self, id: i64) -> Site {
        Site {
            id,
            name: self.name,
            url: self.url,
            description: self.description,
            category_id: self.category_id,
            icon: self.icon,
        }
    }
}

impl CreateSiteDto {
    /// Проверка обязательных полей и формата URL; подставляет значения по умолчанию
    pub fn validate(&self) -> Result<NewSite, CatalogueError> {
        let name = non_blank(self.name.as_deref());
        let url = non_blank(self.url.as_deref());

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if url.is_none() {
            missing.push("url");
        }
        if self.category_id.is_none() {
            missing.push("categoryId");
        }
        let (Some(name), Some(url), Some(category_id)) = (name, url, self.category_id) else {
            return Err(CatalogueError::MissingFields(missing));
        };

        validate_url(url)?;

        Ok(NewSite {
            name: name.to_string(),
            url: url.to_string(),
            description: self.description.clone().unwrap_or_default(),
            category_id,
            icon: non_blank(self.icon.as_deref())
                .map(str::to_string)
                .unwrap_or_else(default_icon),
        })
    }
}

/// PUT /api/sites/:id, все поля необязательны.
///
/// `description: Some("")` означает "очистить описание", `None` означает "не менять".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl UpdateSiteDto {
    /// Только изменённые поля: `edited` сравнивается с `original` после trim.
    ///
    /// Пустое описание передаётся как `Some("")`, чтобы сервер его очистил.
    pub fn changes(original: &Site, edited: &Site) -> Self {
        fn changed(before: &str, after: &str) -> Option<String> {
            let after = after.trim();
            (after != before).then(|| after.to_string())
        }

        Self {
            name: changed(&original.name, &edited.name),
            url: changed(&original.url, &edited.url),
            description: changed(&original.description, &edited.description),
            category_id: (edited.category_id != original.category_id)
                .then_some(edited.category_id),
            icon: changed(&original.icon, &edited.icon),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// URL должен начинаться с `http://` или `https://`, иметь непустой остаток
/// и не содержать пробельных символов.
pub fn is_valid_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => !rest.is_empty() && !url.chars().any(char::is_whitespace),
        None => false,
    }
}

fn validate_url(url: &str) -> Result<(), CatalogueError> {
    if is_valid_url(url) {
        Ok(())
    } else {
        Err(CatalogueError::invalid(format!(
            "Invalid URL '{}': expected an absolute http:// or https:// address",
            url
        )))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

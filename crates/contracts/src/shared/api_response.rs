use serde::{Deserialize, Serialize};

/// Единый конверт ответа API: `{ success, data?, error?, message? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Текст ошибки или запасной вариант, если сервер его не прислал
    pub fn error_or(&self, fallback: &str) -> String {
        self.error.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// GET /api/health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_site::aggregate::Site;
    use serde_json::json;

    #[test]
    fn test_failure_envelope_decodes_without_data() {
        let parsed: ApiResponse<Site> =
            serde_json::from_str(r#"{"success":false,"error":"x"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.data, None);
        assert_eq!(parsed.error_or("fallback"), "x");
    }

    #[test]
    fn test_failure_omits_data() {
        let value = serde_json::to_value(ApiResponse::<()>::failure("Site 1 not found")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Site 1 not found"}));
    }

    #[test]
    fn test_ok_with_message() {
        let value = serde_json::to_value(ApiResponse::ok(7).with_message("done")).unwrap();
        assert_eq!(value, json!({"success": true, "data": 7, "message": "done"}));
    }
}

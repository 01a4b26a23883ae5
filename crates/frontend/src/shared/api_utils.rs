//! API utilities for frontend-backend communication

/// Get the base URL for API requests
///
/// `SITEDIR_API_BASE` at build time wins (e.g. `http://localhost:15001` when
/// the front end is served by `trunk serve`). Otherwise the API lives on the
/// same origin that served the page.
///
/// # Returns
/// - API base URL without a trailing slash
/// - Empty string if window is not available (relative URLs)
pub fn api_base() -> String {
    if let Some(base) = configured_api_base() {
        return base;
    }
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

fn configured_api_base() -> Option<String> {
    normalize_base(option_env!("SITEDIR_API_BASE")?)
}

fn normalize_base(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Backend variant the front end was built for: `SITEDIR_BACKEND=github`
/// means the catalogue lives in a remote repository.
pub fn is_remote_backend() -> bool {
    option_env!("SITEDIR_BACKEND")
        .map(|v| v.trim().eq_ignore_ascii_case("github"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(
            normalize_base("http://localhost:15001/"),
            Some("http://localhost:15001".to_string())
        );
        assert_eq!(normalize_base("  "), None);
    }
}

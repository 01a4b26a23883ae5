/// Режим редактирования включается параметром `?edit=1` или `?edit=true`
pub fn is_edit_mode(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == "edit" && (value == "1" || value.eq_ignore_ascii_case("true")))
}

/// Query string of the current page, empty outside a browser
pub fn current_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

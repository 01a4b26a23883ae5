/// Размер тела ответа для лога запросов: байты с разделителями триад,
/// от 10 КБ в килобайтах.
pub fn format_size(bytes: usize) -> String {
    if bytes < 10 * 1024 {
        return format!("{} B", group_thousands(bytes));
    }
    let kb = bytes as f64 / 1024.0;
    format!("{:.1} KB", kb)
}

fn group_thousands(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(42), "42 B");
        assert_eq!(format_size(1234), "1.234 B");
        assert_eq!(format_size(10 * 1024), "10.0 KB");
        assert_eq!(format_size(1536 * 10), "15.0 KB");
    }
}

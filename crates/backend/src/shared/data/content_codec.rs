//! Кодек содержимого файла для API репозитория: UTF-8 ⇄ base64.
//!
//! Работаем с байтами UTF-8, а не с символами, поэтому многобайтовый текст
//! (китайский, эмодзи) проходит туда и обратно без искажений.

use base64::{engine::general_purpose, Engine as _};

use super::StoreError;

pub fn encode_content(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

/// The contents API wraps base64 at 60 columns, so whitespace is dropped first.
pub fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Encoding(format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Encoding(format!("invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multibyte_round_trip() {
        let text = "{\"name\": \"常用工具 🔧\", \"description\": \"Ünïcödé — текст\"}";
        let encoded = encode_content(text);
        assert!(encoded.is_ascii());
        assert_eq!(decode_content(&encoded).unwrap().as_bytes(), text.as_bytes());
    }

    #[test]
    fn test_known_value() {
        // "中" = E4 B8 AD
        assert_eq!(encode_content("中"), "5Lit");
        assert_eq!(decode_content("5Lit").unwrap(), "中");
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        let encoded = encode_content("line-wrapped content from the contents API");
        let (a, b) = encoded.split_at(10);
        let wrapped = format!("{}\n{}\n", a, b);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "line-wrapped content from the contents API"
        );
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        // 0xFF 0xFE is not valid UTF-8
        let encoded = general_purpose::STANDARD.encode([0xFFu8, 0xFE]);
        assert!(matches!(
            decode_content(&encoded),
            Err(StoreError::Encoding(_))
        ));
    }
}

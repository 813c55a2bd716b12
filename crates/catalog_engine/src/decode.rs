use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Decode a page body to UTF-8.
///
/// Order: BOM, then the `Content-Type` charset, then detection. Malformed
/// sequences become U+FFFD; product text is still usable with a few
/// replacement characters, so this never fails.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| detect(bytes));
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\'']);
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_header_wins_over_detection() {
        let bytes = b"caf\xe9";
        assert_eq!(
            decode_page(bytes, Some("text/html; Charset=\"ISO-8859-1\"")),
            "café"
        );
    }

    #[test]
    fn bom_is_honoured_and_stripped() {
        assert_eq!(decode_page(b"\xEF\xBB\xBFhello", None), "hello");
    }

    #[test]
    fn plain_utf8_without_header() {
        assert_eq!(decode_page("Nutrilite™".as_bytes(), None), "Nutrilite™");
    }
}

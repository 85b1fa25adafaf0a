//! Pre-pass over raw HTML: control characters, comments and character references.
//!
//! The output only contains character references that are valid in XML
//! (`&amp;`, `&apos;`, `&quot;`, `&lt;`, `&gt;`). Every other HTML named or
//! numeric reference is replaced by the character it stands for.

use std::borrow::Cow;

const XML_REFERENCES: [&str; 5] = ["&amp;", "&apos;", "&quot;", "&lt;", "&gt;"];

/// Longest reference name considered, `&CounterClockwiseContourIntegral;` included.
const MAX_REFERENCE_LEN: usize = 40;

pub(crate) const COMMENT_OPEN: &str = "<!--";
pub(crate) const COMMENT_CLOSE: &str = "-->";

/// Normalizes raw HTML before tokenization.
pub fn normalize(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' | b'\t' => {
                out.push_str(&raw[segment_start..i]);
                i += 1;
                segment_start = i;
            }
            b'<' if raw[i..].starts_with(COMMENT_OPEN) => {
                out.push_str(&raw[segment_start..i]);
                let body = i + COMMENT_OPEN.len();
                i = match raw[body..].find(COMMENT_CLOSE) {
                    Some(end) => body + end + COMMENT_CLOSE.len(),
                    None => bytes.len(),
                };
                segment_start = i;
            }
            b'&' => {
                out.push_str(&raw[segment_start..i]);
                match reference_at(&raw[i..]) {
                    Some(reference) => {
                        out.push_str(&convert_reference(reference));
                        i += reference.len();
                    }
                    None => {
                        out.push('&');
                        i += 1;
                    }
                }
                segment_start = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&raw[segment_start..]);
    out
}

/// Returns the `&name;` reference starting `input`, if there is one.
pub(crate) fn reference_at(input: &str) -> Option<&str> {
    let name_len = input
        .bytes()
        .skip(1)
        .take(MAX_REFERENCE_LEN)
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'#' || *b == b'_')
        .count();
    let semicolon = 1 + name_len;
    (input.as_bytes().get(semicolon) == Some(&b';')).then(|| &input[..=semicolon])
}

fn convert_reference(reference: &str) -> Cow<'_, str> {
    if XML_REFERENCES.contains(&reference) {
        return Cow::Borrowed(reference);
    }
    let decoded = html_escape::decode_html_entities(reference);
    // a legacy prefix such as `&not` may decode while leaving `...;` behind
    if decoded == reference || (decoded.ends_with(';') && decoded != ";") {
        return Cow::Owned(format!("&amp;{}", &reference[1..]));
    }
    match decoded.as_ref() {
        "&" => Cow::Borrowed("&amp;"),
        "'" => Cow::Borrowed("&apos;"),
        "\"" => Cow::Borrowed("&quot;"),
        "<" => Cow::Borrowed("&lt;"),
        ">" => Cow::Borrowed("&gt;"),
        _ => Cow::Owned(decoded.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_control_characters() {
        assert_eq!(normalize("a\nb\r\nc\td"), "abcd");
    }

    #[test]
    fn test_named_references_become_characters() {
        assert_eq!(normalize("caf&eacute; &nbsp;x"), "café \u{a0}x");
        assert_eq!(normalize("&euro;"), "€");
    }

    #[test]
    fn test_xml_references_are_kept() {
        assert_eq!(normalize("&lt;b&gt; &amp; &quot;&apos;"), "&lt;b&gt; &amp; &quot;&apos;");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(normalize("&#233;"), "é");
        assert_eq!(normalize("&#60;"), "&lt;");
        assert_eq!(normalize("&#x26;"), "&amp;");
    }

    #[test]
    fn test_unknown_reference_is_escaped() {
        assert_eq!(normalize("&zzz;"), "&amp;zzz;");
        assert_eq!(normalize("&notit;"), "&amp;notit;");
    }

    #[test]
    fn test_bare_ampersand_is_left_for_the_tokenizer() {
        assert_eq!(normalize("Tom & Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(normalize("a<!-- hidden -->b"), "ab");
        assert_eq!(normalize("a<!-- never closed <b>x</b>"), "a");
    }

    #[test]
    fn test_keeps_multibyte_text_intact() {
        assert_eq!(normalize("日本語\n<b>é</b>"), "日本語<b>é</b>");
    }
}

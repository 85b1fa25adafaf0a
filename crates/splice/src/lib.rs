//! Template pre-pass for rich-text markers.
//!
//! Every `{path:html}` marker in a content part is lifted out of its static
//! paragraph and replaced by a `<pressmark>` placeholder carrying the default
//! style the template gives that paragraph. Markers whose paragraph cannot be
//! located within the search window are left untouched.
pub mod defaults;
pub mod marker;
pub mod paragraph;

pub use defaults::{ExtractedStyle, extract_default_style};
pub use marker::{Invocation, WRAPPER_TAG, parse_invocation, strip_placeholder_wrappers};
pub use paragraph::{locate_paragraph, rebuild_paragraph};

use marker::MARKER_RE;
use pressmark_registry::DefaultStyleRegistry;
use pressmark_types::Schema;
use std::ops::Range;

/// Bytes searched on each side of a marker for its enclosing paragraph.
pub const DEFAULT_SPLICE_WINDOW: usize = 64 * 1024;

/// Outcome of [`splice_markers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub xml: String,
    /// Markers turned into placeholders.
    pub spliced: usize,
    /// Markers left as they were.
    pub skipped: usize,
}

/// Replaces the rich-text markers of one XML part by placeholders.
///
/// Default styles found around the markers are registered in `defaults`.
pub fn splice_markers(
    xml: &str,
    schema: Schema,
    defaults: &mut DefaultStyleRegistry,
    window: usize,
) -> Splice {
    let mut splice = Splice {
        xml: String::new(),
        spliced: 0,
        skipped: 0,
    };
    if !xml.contains(":html") {
        splice.xml = xml.to_string();
        return splice;
    }

    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    for found in MARKER_RE.find_iter(xml) {
        if let Some((range, _)) = edits.last()
            && found.start() < range.end
        {
            // Rebuilt together with an earlier marker of the same paragraph.
            continue;
        }
        let Some(range) = locate_paragraph(xml, schema, found.range(), window) else {
            log::debug!(
                "no enclosing paragraph for marker '{}' within {} bytes, leaving it untouched",
                found.as_str(),
                window
            );
            splice.skipped += 1;
            continue;
        };
        if let Some((previous, _)) = edits.last()
            && range.start < previous.end
        {
            log::debug!(
                "paragraph of marker '{}' overlaps one already rebuilt, leaving it untouched",
                found.as_str()
            );
            splice.skipped += 1;
            continue;
        }

        let prefix = &xml[range.start..found.start()];
        let default_style = extract_default_style(schema, prefix, xml).map(|extracted| {
            defaults.register(extracted.id.clone(), extracted.style);
            extracted.id
        });
        let paragraph = &xml[range.clone()];
        splice.spliced += MARKER_RE.find_iter(paragraph).count();
        edits.push((range.clone(), rebuild_paragraph(paragraph, default_style.as_ref())));
    }

    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (range, replacement) in &edits {
        out.push_str(&xml[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&xml[cursor..]);
    splice.xml = out;

    log::debug!(
        "spliced {} rich-text markers ({} skipped)",
        splice.spliced,
        splice.skipped
    );
    splice
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmark_types::DefaultStyleId;

    fn splice(xml: &str, schema: Schema) -> (Splice, DefaultStyleRegistry) {
        let mut defaults = DefaultStyleRegistry::new();
        let splice = splice_markers(xml, schema, &mut defaults, DEFAULT_SPLICE_WINDOW);
        (splice, defaults)
    }

    #[test]
    fn test_unlocatable_marker_leaves_xml_identical() {
        let xml = "<w:body><w:r><w:t>{d.x:html}</w:t></w:r></w:body>";
        let (result, defaults) = splice(xml, Schema::Docx);
        assert_eq!(result.xml, xml);
        assert_eq!(result.spliced, 0);
        assert_eq!(result.skipped, 1);
        assert!(defaults.is_empty());
    }

    #[test]
    fn test_paragraph_outside_window_is_not_found() {
        let xml = format!("<w:p>{}<w:r><w:t>{{d.x:html}}</w:t></w:r></w:p>", "x".repeat(100));
        let mut defaults = DefaultStyleRegistry::new();
        let result = splice_markers(&xml, Schema::Docx, &mut defaults, 50);
        assert_eq!(result.xml, xml);
    }

    #[test]
    fn test_default_style_is_registered() {
        let xml = concat!(
            r#"<w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>{d.body:html}</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>{d.title}</w:t></w:r></w:p></w:body>"#
        );
        let (result, defaults) = splice(xml, Schema::Docx);
        assert_eq!(
            result.xml,
            concat!(
                r#"<w:body><pressmark>{d.body:html('style-textaligncenter')}</pressmark>"#,
                r#"<w:p><w:r><w:t>{d.title}</w:t></w:r></w:p></w:body>"#
            )
        );
        let style = defaults
            .get(&DefaultStyleId::from("style-textaligncenter"))
            .unwrap();
        assert_eq!(style.paragraph, r#"<w:jc w:val="center"/>"#);
        assert!(style.text.is_empty());
    }

    #[test]
    fn test_markers_in_one_paragraph_are_rebuilt_once() {
        let xml = "<office:text><text:p>{d.a:html} and {d.b:html}</text:p><text:p>{d.c:html}</text:p></office:text>";
        let (result, _) = splice(xml, Schema::Odt);
        assert_eq!(result.spliced, 3);
        assert_eq!(
            result.xml,
            concat!(
                "<office:text><pressmark>{d.a:html}</pressmark><text:p> and </text:p>",
                "<pressmark>{d.b:html}</pressmark><pressmark>{d.c:html}</pressmark></office:text>"
            )
        );
    }

    #[test]
    fn test_marker_after_rebuilt_paragraph_is_skipped() {
        let xml = concat!(
            "<w:body><w:p><w:r><w:t>{d.a:html}</w:t></w:r></w:p>",
            "<w:r><w:t>{d.b:html}</w:t></w:r><w:p></w:p></w:body>"
        );
        let (result, _) = splice(xml, Schema::Docx);
        assert_eq!(result.spliced, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(
            result.xml,
            concat!(
                "<w:body><pressmark>{d.a:html}</pressmark>",
                "<w:r><w:t>{d.b:html}</w:t></w:r><w:p></w:p></w:body>"
            )
        );
    }

    #[test]
    fn test_stray_marker_among_paragraphs() {
        let xml = concat!(
            "<w:body><w:r><w:t>{d.a:html}</w:t></w:r>",
            "<w:p><w:r><w:t>{d.b:html}</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>x</w:t></w:r></w:p><w:r><w:t>{d.c:html}</w:t></w:r></w:body>"
        );
        let (result, _) = splice(xml, Schema::Docx);
        assert_eq!(result.spliced, 1);
        assert_eq!(result.skipped, 2);
        assert_eq!(
            result.xml,
            concat!(
                "<w:body><w:r><w:t>{d.a:html}</w:t></w:r>",
                "<pressmark>{d.b:html}</pressmark>",
                "<w:p><w:r><w:t>x</w:t></w:r></w:p><w:r><w:t>{d.c:html}</w:t></w:r></w:body>"
            )
        );
    }

    #[test]
    fn test_plain_parts_are_untouched() {
        let xml = "<w:p><w:r><w:t>{d.title}</w:t></w:r></w:p>";
        let (result, _) = splice(xml, Schema::Docx);
        assert_eq!(result.xml, xml);
        assert_eq!(result.spliced + result.skipped, 0);
    }
}

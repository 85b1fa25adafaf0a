//! Locating the paragraph around a marker and rebuilding it around placeholders.
use crate::marker::{Invocation, MARKER_RE};
use pressmark_types::{DefaultStyleId, Schema};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+?>").expect("BUG: invalid TAG_RE regex literal"));

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Finds the paragraph enclosing the marker at `marker`.
///
/// The open tag is searched backwards and the close tag forwards, each within
/// `window` bytes of the marker. An open tag only counts when followed by a
/// space or `>`, so `<w:pPr>` or `<w:proofErr/>` never pass for `<w:p`. A
/// marker after the close of the nearest paragraph has no enclosing paragraph.
pub fn locate_paragraph(
    xml: &str,
    schema: Schema,
    marker: Range<usize>,
    window: usize,
) -> Option<Range<usize>> {
    let tags = schema.paragraph_open_tags();
    let lower = floor_boundary(xml, marker.start.saturating_sub(window));
    let mut upper = marker.start;

    let (start, index) = loop {
        let region = &xml[lower..upper];
        let (start, index) = tags
            .iter()
            .enumerate()
            .filter_map(|(index, tag)| region.rfind(tag).map(|pos| (lower + pos, index)))
            .max_by_key(|&(pos, _)| pos)?;
        let after = xml.as_bytes().get(start + tags[index].len()).copied();
        if matches!(after, Some(b' ' | b'>')) {
            break (start, index);
        }
        upper = start;
    };

    let close = schema.paragraph_close_tag(index);
    if xml[start..marker.start].contains(close) {
        // The nearest paragraph closed before the marker.
        return None;
    }
    let limit = ceil_boundary(xml, marker.end.saturating_add(window));
    let end = xml[marker.end..limit].find(close)? + marker.end + close.len();
    Some(start..end)
}

enum Segment<'a> {
    /// Static text and its byte offset in the tag skeleton.
    Text { pos: usize, text: &'a str },
    Placeholder(String),
}

fn split_text<'a>(
    text: &'a str,
    pos: usize,
    default_style: Option<&DefaultStyleId>,
    segments: &mut Vec<Segment<'a>>,
) {
    let mut cursor = 0;
    for caps in MARKER_RE.captures_iter(text) {
        let Some(found) = caps.get(0) else {
            continue;
        };
        if found.start() > cursor {
            segments.push(Segment::Text {
                pos,
                text: &text[cursor..found.start()],
            });
        }
        let invocation = Invocation::new(&caps[1], default_style.cloned());
        segments.push(Segment::Placeholder(invocation.to_placeholder()));
        cursor = found.end();
    }
    if cursor < text.len() {
        segments.push(Segment::Text {
            pos,
            text: &text[cursor..],
        });
    }
}

/// Rebuilds a paragraph so that every marker becomes a placeholder between
/// paragraphs.
///
/// The paragraph's tags form a skeleton. Static text before, between and after
/// the markers is put back into clones of that skeleton at its original
/// positions; a paragraph holding nothing but a marker disappears entirely.
pub fn rebuild_paragraph(paragraph: &str, default_style: Option<&DefaultStyleId>) -> String {
    let mut skeleton = String::with_capacity(paragraph.len());
    let mut segments = Vec::new();
    let mut cursor = 0;
    for tag in TAG_RE.find_iter(paragraph) {
        if tag.start() > cursor {
            split_text(
                &paragraph[cursor..tag.start()],
                skeleton.len(),
                default_style,
                &mut segments,
            );
        }
        skeleton.push_str(tag.as_str());
        cursor = tag.end();
    }
    if cursor < paragraph.len() {
        split_text(&paragraph[cursor..], skeleton.len(), default_style, &mut segments);
    }

    // Walk backwards so earlier insert positions stay valid within a clone.
    let mut pieces = Vec::new();
    let mut clone: Option<String> = None;
    for segment in segments.into_iter().rev() {
        match segment {
            Segment::Text { pos, text } => {
                clone.get_or_insert_with(|| skeleton.clone()).insert_str(pos, text);
            }
            Segment::Placeholder(placeholder) => {
                pieces.extend(clone.take());
                pieces.push(placeholder);
            }
        }
    }
    pieces.extend(clone);
    pieces.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(xml: &str, schema: Schema, window: usize) -> Option<String> {
        let marker = MARKER_RE.find(xml)?;
        locate_paragraph(xml, schema, marker.range(), window).map(|range| xml[range].to_string())
    }

    #[test]
    fn test_locate_skips_paragraph_properties() {
        let xml = r#"<w:body><w:p w:rsidR="1"><w:pPr><w:jc w:val="left"/></w:pPr><w:proofErr/><w:r><w:t>{d.x:html}</w:t></w:r></w:p><w:p/></w:body>"#;
        assert_eq!(
            locate(xml, Schema::Docx, 1000).unwrap(),
            r#"<w:p w:rsidR="1"><w:pPr><w:jc w:val="left"/></w:pPr><w:proofErr/><w:r><w:t>{d.x:html}</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_locate_prefers_nearest_tree_tag() {
        let xml = "<text:p>a</text:p><text:h text:outline-level=\"1\">{d.x:html}</text:h>";
        assert_eq!(
            locate(xml, Schema::Odt, 1000).unwrap(),
            "<text:h text:outline-level=\"1\">{d.x:html}</text:h>"
        );
    }

    #[test]
    fn test_locate_rejects_marker_between_paragraphs() {
        let xml = "<w:p><w:r><w:t>a</w:t></w:r></w:p><w:r><w:t>{d.x:html}</w:t></w:r><w:p></w:p>";
        assert_eq!(locate(xml, Schema::Docx, 1000), None);
    }

    #[test]
    fn test_locate_respects_window() {
        let xml = format!("<w:p>{}<w:r><w:t>{{d.x:html}}</w:t></w:r></w:p>", "é".repeat(50));
        assert!(locate(&xml, Schema::Docx, 1000).is_some());
        assert!(locate(&xml, Schema::Docx, 31).is_none());
    }

    #[test]
    fn test_rebuild_marker_only_paragraph() {
        let paragraph = "<w:p><w:r><w:t>{d.x:html}</w:t></w:r></w:p>";
        assert_eq!(
            rebuild_paragraph(paragraph, Some(&DefaultStyleId::from("style-fs24"))),
            "<pressmark>{d.x:html('style-fs24')}</pressmark>"
        );
    }

    #[test]
    fn test_rebuild_keeps_static_text() {
        let paragraph = "<w:p><w:r><w:t>Hello {d.x:html} world</w:t></w:r></w:p>";
        assert_eq!(
            rebuild_paragraph(paragraph, None),
            concat!(
                "<w:p><w:r><w:t>Hello </w:t></w:r></w:p>",
                "<pressmark>{d.x:html}</pressmark>",
                "<w:p><w:r><w:t> world</w:t></w:r></w:p>"
            )
        );
    }

    #[test]
    fn test_rebuild_static_runs_keep_their_position() {
        let paragraph = "<w:p><w:r><w:t>A</w:t></w:r><w:r><w:t>{d.x:html}</w:t></w:r><w:r><w:t>B</w:t></w:r></w:p>";
        assert_eq!(
            rebuild_paragraph(paragraph, None),
            concat!(
                "<w:p><w:r><w:t>A</w:t></w:r><w:r><w:t></w:t></w:r><w:r><w:t></w:t></w:r></w:p>",
                "<pressmark>{d.x:html}</pressmark>",
                "<w:p><w:r><w:t></w:t></w:r><w:r><w:t></w:t></w:r><w:r><w:t>B</w:t></w:r></w:p>"
            )
        );
    }

    #[test]
    fn test_rebuild_two_markers() {
        let paragraph = "<text:p>{d.a:html}and{d.b:html}</text:p>";
        assert_eq!(
            rebuild_paragraph(paragraph, None),
            "<pressmark>{d.a:html}</pressmark><text:p>and</text:p><pressmark>{d.b:html}</pressmark>"
        );
    }
}

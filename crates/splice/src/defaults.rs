//! Default text and paragraph properties inherited from the template.
//!
//! The properties are read from the part of the enclosing paragraph that
//! precedes the marker, so compiled rich text looks like the static text the
//! template author placed around it.
use itertools::Itertools;
use pressmark_registry::TemplateStyle;
use pressmark_types::{DefaultStyleId, Schema};
use regex::Regex;
use std::sync::LazyLock;

static RFONTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:rFonts\s[^>]*?(?:w:ascii|w:hAnsi|w:cs|w:eastAsia)="([^"]*)"[^>]*?/>"#)
        .expect("BUG: invalid RFONTS_RE regex literal")
});
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:sz\s[^>]*?w:val="([^"]*)"[^>]*?/>"#).expect("BUG: invalid SIZE_RE regex literal")
});
static BIDI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:bidi(?:\s[^>]*?)?/>").expect("BUG: invalid BIDI_RE regex literal")
});
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:color\s[^>]*?w:val="([^"]*)"[^>]*?/>"#)
        .expect("BUG: invalid COLOR_RE regex literal")
});
static HIGHLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:highlight\s[^>]*?w:val="([^"]*)"[^>]*?/>"#)
        .expect("BUG: invalid HIGHLIGHT_RE regex literal")
});
static JUSTIFY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:jc\s[^>]*?w:val="([^"]*)"[^>]*?/>"#).expect("BUG: invalid JUSTIFY_RE regex literal")
});

static PARAGRAPH_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"text:style-name="(P[^"]*)""#).expect("BUG: invalid PARAGRAPH_STYLE_RE regex literal")
});
static TEXT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"text:style-name="(T[^"]*)""#).expect("BUG: invalid TEXT_STYLE_RE regex literal")
});
static TEXT_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:style:font-name|style:font-name-complex|fo:font-size|fo:background-color|fo:color)="[^"]*""#,
    )
    .expect("BUG: invalid TEXT_PROPERTY_RE regex literal")
});

/// Default style read from a paragraph prefix, with the key it is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStyle {
    pub id: DefaultStyleId,
    pub style: TemplateStyle,
}

/// Reads the default style of a paragraph.
///
/// `prefix` runs from the paragraph start to the marker; `document` is the
/// whole part, searched for the automatic text styles of the tree schema.
/// Returns `None` when nothing was found.
pub fn extract_default_style(schema: Schema, prefix: &str, document: &str) -> Option<ExtractedStyle> {
    let mut id = String::from("style");
    let mut style = TemplateStyle::default();
    match schema {
        Schema::Docx => extract_docx(prefix, &mut id, &mut style),
        Schema::Odt => extract_odt(prefix, document, &mut id, &mut style),
    }
    if id == "style" {
        return None;
    }
    Some(ExtractedStyle {
        id: DefaultStyleId::from(id),
        style,
    })
}

fn extract_docx(prefix: &str, id: &mut String, style: &mut TemplateStyle) {
    if let Some(caps) = RFONTS_RE.captures(prefix)
        && !caps[1].is_empty()
    {
        id.push_str(&format!("-ff{}", &caps[1]));
        style.text.push_str(&caps[0]);
        style.paragraph.push_str(&caps[0]);
    }
    if let Some(caps) = SIZE_RE.captures(prefix)
        && !caps[1].is_empty()
    {
        id.push_str(&format!("-fs{}", &caps[1]));
        style.text.push_str(&caps[0]);
        style.paragraph.push_str(&caps[0]);
    }
    if let Some(found) = BIDI_RE.find(prefix) {
        id.push_str("-rtl");
        style.paragraph.push_str(found.as_str());
    }
    if let Some(caps) = COLOR_RE.captures(prefix)
        && !caps[1].is_empty()
    {
        id.push_str(&format!("-tcolor{}", &caps[1]));
        style.text.push_str(&caps[0]);
    }
    if let Some(caps) = HIGHLIGHT_RE.captures(prefix)
        && !caps[1].is_empty()
    {
        id.push_str(&format!("-bgcolor{}", &caps[1]));
        style.text.push_str(&caps[0]);
    }
    if let Some(caps) = JUSTIFY_RE.captures(prefix)
        && !caps[1].is_empty()
    {
        id.push_str(&format!("-textalign{}", &caps[1]));
        style.paragraph.push_str(&caps[0]);
    }
}

fn extract_odt(prefix: &str, document: &str, id: &mut String, style: &mut TemplateStyle) {
    if let Some(caps) = PARAGRAPH_STYLE_RE.captures(prefix) {
        id.push_str(&format!("-{}", &caps[1]));
        style.paragraph = caps[0].to_string();
    }
    let Some(caps) = TEXT_STYLE_RE.captures(prefix) else {
        return;
    };
    let name = &caps[1];
    match text_properties(document, name) {
        Some(properties) => {
            id.push_str(&format!("-{name}"));
            style.text = TEXT_PROPERTY_RE
                .find_iter(&properties)
                .map(|found| found.as_str())
                .join(" ");
        }
        None => log::debug!("text style '{}' not found among automatic styles", name),
    }
}

/// The `style:text-properties` attributes of an automatic text style.
fn text_properties(document: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r#"<style:style style:name="{}"[^>]*>\s*<style:text-properties ([^>]*?)/?>"#,
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(document).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_run_and_paragraph_properties() {
        let prefix = concat!(
            r#"<w:p><w:pPr><w:bidi/><w:jc w:val="center"/><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial"/>"#,
            r#"<w:color w:val="FF0000"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:pPr><w:r><w:t>"#
        );
        let extracted = extract_default_style(Schema::Docx, prefix, prefix).unwrap();
        assert_eq!(
            extracted.id.as_str(),
            "style-ffArial-fs28-rtl-tcolorFF0000-textaligncenter"
        );
        assert_eq!(
            extracted.style.text,
            r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:sz w:val="28"/><w:color w:val="FF0000"/>"#
        );
        assert_eq!(
            extracted.style.paragraph,
            r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:sz w:val="28"/><w:bidi/><w:jc w:val="center"/>"#
        );
    }

    #[test]
    fn test_docx_highlight_and_bidi_visual() {
        let prefix = r#"<w:p><w:pPr><w:bidiVisual/></w:pPr><w:r><w:rPr><w:highlight w:val="yellow"/></w:rPr><w:t>"#;
        let extracted = extract_default_style(Schema::Docx, prefix, prefix).unwrap();
        assert_eq!(extracted.id.as_str(), "style-bgcoloryellow");
        assert!(extracted.style.paragraph.is_empty());
    }

    #[test]
    fn test_docx_plain_paragraph_has_no_default() {
        assert_eq!(extract_default_style(Schema::Docx, "<w:p><w:r><w:t>", ""), None);
    }

    #[test]
    fn test_odt_paragraph_and_text_style() {
        let document = concat!(
            r#"<office:automatic-styles><style:style style:name="T1" style:family="text">"#,
            r##"<style:text-properties style:font-name="Arial" fo:font-size="14pt" fo:font-weight="bold" fo:color="#ff0000"/>"##,
            r#"</style:style></office:automatic-styles>"#
        );
        let prefix = r#"<text:p text:style-name="P1"><text:span text:style-name="T1">"#;
        let extracted = extract_default_style(Schema::Odt, prefix, document).unwrap();
        assert_eq!(extracted.id.as_str(), "style-P1-T1");
        assert_eq!(extracted.style.paragraph, r#"text:style-name="P1""#);
        assert_eq!(
            extracted.style.text,
            r##"style:font-name="Arial" fo:font-size="14pt" fo:color="#ff0000""##
        );
    }

    #[test]
    fn test_odt_missing_text_style() {
        let prefix = r#"<text:p text:style-name="Standard"><text:span text:style-name="T9">"#;
        assert_eq!(extract_default_style(Schema::Odt, prefix, ""), None);
    }
}

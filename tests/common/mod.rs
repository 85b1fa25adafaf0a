use pressmark::{JobConfig, JobState, Package, Schema, render_html};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const DOCX_DOCUMENT: &str = "word/document.xml";
pub const DOCX_NUMBERING: &str = "word/numbering.xml";
pub const DOCX_RELATIONSHIPS: &str = "word/_rels/document.xml.rels";
pub const DOCX_CONTENT_TYPES: &str = "[Content_Types].xml";
pub const ODT_CONTENT: &str = "content.xml";
pub const ODT_MANIFEST: &str = "META-INF/manifest.xml";

/// A minimal WordprocessingML package whose body is `body`.
pub fn docx_package(body: &str) -> Package {
    Package::new()
        .with_text(
            DOCX_CONTENT_TYPES,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
        )
        .with_text(
            DOCX_DOCUMENT,
            format!(
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
            ),
        )
        .with_text(
            DOCX_NUMBERING,
            r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"></w:numbering>"#,
        )
        .with_text(
            DOCX_RELATIONSHIPS,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#,
        )
}

/// A minimal OpenDocument text package whose body is `body`.
pub fn odt_package(body: &str) -> Package {
    Package::new()
        .with_text(
            ODT_CONTENT,
            format!(
                "<office:document-content><office:automatic-styles></office:automatic-styles><office:body><office:text>{body}</office:text></office:body></office:document-content>"
            ),
        )
        .with_text(
            ODT_MANIFEST,
            r#"<manifest:manifest><manifest:file-entry manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.text"/></manifest:manifest>"#,
        )
}

/// Compiles `html` in a fresh job and flushes it right away.
pub fn compile(schema: Schema, html: &str) -> (String, JobState) {
    let mut job = JobState::new(JobConfig::for_schema(schema));
    let xml = render_html(html, &mut job, None).build(&job);
    (xml, job)
}

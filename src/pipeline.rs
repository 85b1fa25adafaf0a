//! Render job over one document package.
//!
//! A job runs four steps in order: [`RenderJob::preprocess`] splices the
//! rich-text markers of the template, [`RenderJob::render`] compiles the HTML
//! behind every placeholder, [`RenderJob::resolve_images`] is the single point
//! where image metadata enters the job, and [`RenderJob::finish`] flushes the
//! compiled fragments and writes the styles, numbering, relationships and
//! media they depend on.
use crate::data::resolve_string;
use crate::options::RenderOptions;
use crate::package::Package;
use pressmark_registry::JobState;
use pressmark_render::{
    ContentBuilder, docx_abstract_numbers, docx_nums, docx_relationships, odt_automatic_styles,
    render_html,
};
use pressmark_splice::{WRAPPER_TAG, parse_invocation, splice_markers, strip_placeholder_wrappers};
use pressmark_traits::ImageProbe;
use pressmark_types::Schema;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<{WRAPPER_TAG}>(\{{[^{{}}]*\}})</{WRAPPER_TAG}>"))
        .expect("BUG: invalid PLACEHOLDER_RE regex literal")
});

static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pressmark-slot index="(\d+)"/>"#).expect("BUG: invalid SLOT_RE regex literal")
});

const ODT_CONTENT: &str = "content.xml";
const ODT_MANIFEST: &str = "META-INF/manifest.xml";
const DOCX_NUMBERING: &str = "word/numbering.xml";
const DOCX_RELATIONSHIPS: &str = "word/_rels/document.xml.rels";
const DOCX_CONTENT_TYPES: &str = "[Content_Types].xml";

/// Whether a part can hold rich-text markers.
pub fn is_content_part(schema: Schema, name: &str) -> bool {
    match schema {
        Schema::Odt => name == ODT_CONTENT,
        Schema::Docx => {
            name.ends_with(".xml")
                && ["word/document", "word/header", "word/footer"]
                    .iter()
                    .any(|prefix| name.starts_with(prefix))
        }
    }
}

fn insert_before_last(xml: &mut String, anchor: &str, fragment: &str) -> bool {
    match xml.rfind(anchor) {
        Some(pos) => {
            xml.insert_str(pos, fragment);
            true
        }
        None => false,
    }
}

/// Owns the per-job state while a package goes through the pipeline.
#[derive(Debug)]
pub struct RenderJob {
    options: RenderOptions,
    job: JobState,
    slots: Vec<ContentBuilder>,
}

impl RenderJob {
    pub fn new(options: RenderOptions) -> Self {
        let job = JobState::new(options.job_config());
        Self {
            options,
            job,
            slots: Vec::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn state(&self) -> &JobState {
        &self.job
    }

    pub fn schema(&self) -> Schema {
        self.options.schema
    }

    fn content_parts(&self, package: &Package) -> Vec<String> {
        let schema = self.schema();
        package.text_parts_where(|name| is_content_part(schema, name))
    }

    /// Turns the markers of every content part into placeholders.
    ///
    /// Returns the number of markers spliced.
    pub fn preprocess(&mut self, package: &mut Package) -> usize {
        let schema = self.schema();
        let mut spliced = 0;
        for name in self.content_parts(package) {
            let Some(xml) = package.text_mut(&name) else {
                continue;
            };
            let splice = splice_markers(xml, schema, &mut self.job.defaults, self.options.splice_window);
            if splice.skipped > 0 {
                log::debug!("{}: {} markers left untouched", name, splice.skipped);
            }
            spliced += splice.spliced;
            *xml = splice.xml;
        }
        spliced
    }

    /// Compiles the HTML each placeholder points at.
    ///
    /// Placeholders are swapped for slots; the compiled fragments stay
    /// unresolved until [`RenderJob::finish`]. Returns the number of
    /// placeholders compiled.
    pub fn render(&mut self, package: &mut Package, data: &Value) -> usize {
        let mut rendered = 0;
        for name in self.content_parts(package) {
            let Some(xml) = package.text_mut(&name) else {
                continue;
            };
            let mut out = String::with_capacity(xml.len());
            let mut cursor = 0;
            for caps in PLACEHOLDER_RE.captures_iter(xml.as_str()) {
                let Some(invocation) = parse_invocation(&caps[1]) else {
                    log::debug!("skipping malformed placeholder '{}'", &caps[0]);
                    continue;
                };
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let html = resolve_string(data, &invocation.path).unwrap_or_else(|| {
                    log::debug!("no text at '{}', rendering nothing", invocation.path);
                    String::new()
                });
                let builder = render_html(&html, &mut self.job, invocation.default_style.as_ref());

                out.push_str(&xml[cursor..whole.start()]);
                out.push_str(&format!(r#"<pressmark-slot index="{}"/>"#, self.slots.len()));
                self.slots.push(builder);
                cursor = whole.end();
                rendered += 1;
            }
            if cursor > 0 {
                out.push_str(&xml[cursor..]);
                *xml = out;
            }
        }
        rendered
    }

    /// Attaches metadata to every image the compiled HTML referenced.
    ///
    /// A failed probe is logged and leaves the image without metadata, so its
    /// sizes fall back to zero. Returns the number of images resolved.
    pub fn resolve_images(&mut self, probe: &dyn ImageProbe) -> usize {
        let mut resolved = 0;
        for src in self.job.images.sources() {
            match probe.probe(&src) {
                Ok(info) => {
                    if self.job.images.attach(&src, info) {
                        resolved += 1;
                    }
                }
                Err(err) => log::warn!("{} could not resolve image '{}': {}", probe.name(), src, err),
            }
        }
        resolved
    }

    /// Writes the compiled fragments and everything they reference into the package.
    pub fn finish(&mut self, package: &mut Package) {
        for name in self.content_parts(package) {
            let Some(xml) = package.text_mut(&name) else {
                continue;
            };
            let filled = SLOT_RE.replace_all(xml.as_str(), |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.slots.get(index))
                    .map(|builder| builder.build(&self.job))
                    .unwrap_or_default()
            });
            let stripped = strip_placeholder_wrappers(&filled);
            *xml = stripped;
        }
        match self.schema() {
            Schema::Odt => self.finish_odt(package),
            Schema::Docx => self.finish_docx(package),
        }
    }

    /// Runs all four steps.
    pub fn run(&mut self, package: &mut Package, data: &Value, probe: &dyn ImageProbe) {
        self.preprocess(package);
        self.render(package, data);
        self.resolve_images(probe);
        self.finish(package);
    }

    fn finish_odt(&self, package: &mut Package) {
        let styles = odt_automatic_styles(&self.job);
        if !styles.is_empty() {
            match package.text_mut(ODT_CONTENT) {
                Some(content) => {
                    let wrapped = format!("<office:automatic-styles>{styles}</office:automatic-styles>");
                    if content.contains("</office:automatic-styles>") {
                        insert_before_last(content, "</office:automatic-styles>", &styles);
                    } else if content.contains("<office:automatic-styles/>") {
                        *content = content.replacen("<office:automatic-styles/>", &wrapped, 1);
                    } else if let Some(pos) = content.find("<office:body") {
                        content.insert_str(pos, &wrapped);
                    } else {
                        log::warn!("{} has no place for automatic styles", ODT_CONTENT);
                    }
                }
                None => log::warn!("package has no {}, styles are dropped", ODT_CONTENT),
            }
        }

        for record in self.job.images.iter() {
            let Some(info) = &record.info else {
                continue;
            };
            let Some(data) = &info.data else {
                log::debug!("image '{}' has no data, nothing to embed", record.src);
                continue;
            };
            let path = format!("Pictures/{}", self.job.images.file_name(record));
            if let Some(manifest) = package.text_mut(ODT_MANIFEST) {
                let entry = format!(
                    r#"<manifest:file-entry manifest:full-path="{}" manifest:media-type="{}"/>"#,
                    path, info.mime_type
                );
                insert_before_last(manifest, "</manifest:manifest>", &entry);
            }
            package.insert_binary(path, data.to_vec());
        }
    }

    fn finish_docx(&self, package: &mut Package) {
        let abstracts = docx_abstract_numbers(&self.job);
        if !abstracts.is_empty() {
            match package.text_mut(DOCX_NUMBERING) {
                Some(numbering) => {
                    let before = numbering
                        .find("<w:abstractNum")
                        .or_else(|| numbering.rfind("</w:numbering>"));
                    if let Some(pos) = before {
                        numbering.insert_str(pos, &abstracts);
                    }
                    insert_before_last(numbering, "</w:numbering>", &docx_nums(&self.job));
                }
                None => log::warn!("package has no {}, list numbering is dropped", DOCX_NUMBERING),
            }
        }

        let relationships = docx_relationships(&self.job);
        if !relationships.is_empty() {
            match package.text_mut(DOCX_RELATIONSHIPS) {
                Some(rels) => {
                    insert_before_last(rels, "</Relationships>", &relationships);
                }
                None => log::warn!("package has no {}, links and images are dropped", DOCX_RELATIONSHIPS),
            }
        }

        for record in self.job.images.iter() {
            let Some(info) = &record.info else {
                continue;
            };
            let Some(data) = &info.data else {
                log::debug!("image '{}' has no data, nothing to embed", record.src);
                continue;
            };
            if let Some(types) = package.text_mut(DOCX_CONTENT_TYPES)
                && !types.contains(&format!(r#"Extension="{}""#, info.extension))
            {
                let entry = format!(
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    info.extension, info.mime_type
                );
                insert_before_last(types, "</Types>", &entry);
            }
            package.insert_binary(
                format!("word/media/{}", self.job.images.file_name(record)),
                data.to_vec(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmark_traits::InMemoryImageProbe;
    use pressmark_types::ImageInfo;
    use serde_json::json;

    #[test]
    fn test_content_parts() {
        assert!(is_content_part(Schema::Docx, "word/document.xml"));
        assert!(is_content_part(Schema::Docx, "word/footer2.xml"));
        assert!(!is_content_part(Schema::Docx, "word/_rels/document.xml.rels"));
        assert!(!is_content_part(Schema::Docx, "word/styles.xml"));
        assert!(is_content_part(Schema::Odt, "content.xml"));
        assert!(!is_content_part(Schema::Odt, "styles.xml"));
    }

    #[test]
    fn test_placeholder_becomes_slot_then_fragment() {
        let mut package = Package::new().with_text(
            "word/document.xml",
            "<w:body><w:p><w:r><w:t>{d.body:html}</w:t></w:r></w:p></w:body>",
        );
        let mut job = RenderJob::new(RenderOptions::default());
        assert_eq!(job.preprocess(&mut package), 1);
        assert_eq!(
            package.text("word/document.xml"),
            Some("<w:body><pressmark>{d.body:html}</pressmark></w:body>")
        );

        assert_eq!(job.render(&mut package, &json!({ "body": "<i>x</i>" })), 1);
        assert_eq!(
            package.text("word/document.xml"),
            Some(r#"<w:body><pressmark-slot index="0"/></w:body>"#)
        );

        job.finish(&mut package);
        assert_eq!(
            package.text("word/document.xml"),
            Some(r#"<w:body><w:p><w:r><w:rPr><w:i/><w:iCs/></w:rPr><w:t xml:space="preserve">x</w:t></w:r></w:p></w:body>"#)
        );
    }

    #[test]
    fn test_failed_probe_is_absorbed() {
        let mut package = Package::new().with_text("word/document.xml", "<pressmark>{d.x:html}</pressmark>");
        let mut job = RenderJob::new(RenderOptions::default());
        job.render(&mut package, &json!({ "x": r#"<img src="a.png"><img src="b.png">"# }));

        let probe = InMemoryImageProbe::new();
        probe.add("a.png", ImageInfo::new(10, 10, "png")).unwrap();
        assert_eq!(job.resolve_images(&probe), 1);
        assert!(job.state().images.get("b.png").unwrap().info.is_none());
    }
}

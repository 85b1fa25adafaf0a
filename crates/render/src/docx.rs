//! Emitter for the flat schema (WordprocessingML `word/document.xml`).
//!
//! Every list item is a top-level `w:p` whose `w:numPr` names the list's
//! numbering id and the item's level; run properties are written inline.
use crate::builder::{ContentBuilder, Deferred};
use crate::emitter::{Emitter, starts_empty_list};
use pressmark_markup::{Token, TokenKind};
use pressmark_registry::{JobState, NumberingId, TemplateStyle, validate_url};
use pressmark_types::{Axis, DefaultStyleId, LengthUnit};

const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PICTURE_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

#[derive(Debug, Default)]
struct OpenList {
    item_open: bool,
    /// The item's numbered paragraph has not been written yet.
    pending: bool,
}

#[derive(Debug)]
pub struct DocxEmitter {
    default_id: Option<DefaultStyleId>,
    default: TemplateStyle,
    paragraph_open: bool,
    paragraph_has_content: bool,
    /// A top-level HTML `<p>` is open; its end is followed by a spacing paragraph.
    html_paragraph: bool,
    anchor_depth: usize,
    /// Relationship id of the open hyperlink.
    anchor_ref: Option<String>,
    lists: Vec<OpenList>,
}

impl DocxEmitter {
    pub fn new(default_id: Option<&DefaultStyleId>) -> Self {
        Self {
            default_id: default_id.cloned(),
            default: TemplateStyle::default(),
            paragraph_open: false,
            paragraph_has_content: false,
            html_paragraph: false,
            anchor_depth: 0,
            anchor_ref: None,
            lists: Vec::new(),
        }
    }

    fn paragraph_properties(&self) -> String {
        if self.default.paragraph.is_empty() {
            String::new()
        } else {
            format!("<w:pPr>{}</w:pPr>", self.default.paragraph)
        }
    }

    fn numbered_properties(&self, job: &JobState) -> String {
        let Some((shape, depth)) = job.lists.current_level() else {
            return self.paragraph_properties();
        };
        let id = match &shape.id {
            NumberingId::Numeric(id) => *id,
            NumberingId::Style(name) => {
                log::debug!("list style '{}' used in a flat document", name);
                job.config.numbering_base
            }
        };
        let run = if self.default.text.is_empty() {
            String::new()
        } else {
            format!("<w:rPr>{}</w:rPr>", self.default.text)
        };
        format!(
            r#"<w:pPr><w:numPr><w:ilvl w:val="{depth}"/><w:numId w:val="{id}"/></w:numPr>{}{run}</w:pPr>"#,
            self.default.paragraph
        )
    }

    fn empty_paragraph(&self, out: &mut ContentBuilder) {
        if self.default.paragraph.is_empty() {
            out.add("<w:p/>");
        } else {
            out.add(&format!("<w:p>{}</w:p>", self.paragraph_properties()));
        }
    }

    fn open_paragraph(&mut self, job: &JobState, out: &mut ContentBuilder) {
        let pending = self.lists.last().is_some_and(|list| list.pending);
        let properties = if pending {
            self.numbered_properties(job)
        } else {
            self.paragraph_properties()
        };
        if let Some(list) = self.lists.last_mut() {
            list.pending = false;
        }
        out.add(&format!("<w:p>{properties}"));
        self.paragraph_open = true;
        self.paragraph_has_content = false;
    }

    fn close_paragraph(&mut self, out: &mut ContentBuilder) {
        if !self.paragraph_open {
            return;
        }
        if self.anchor_depth > 0 {
            out.add("</w:hyperlink>");
            self.anchor_depth = 0;
            self.anchor_ref = None;
        }
        out.add("</w:p>");
        self.paragraph_open = false;
    }

    /// Writes the numbered paragraph of an item that never received content.
    fn flush_pending_item(&mut self, job: &JobState, out: &mut ContentBuilder) {
        if self.lists.last().is_some_and(|list| list.pending) {
            self.open_paragraph(job, out);
            self.close_paragraph(out);
        }
    }

    fn ensure_paragraph(&mut self, job: &JobState, out: &mut ContentBuilder) -> bool {
        if self.paragraph_open {
            return true;
        }
        if let Some(list) = self.lists.last()
            && !list.item_open
        {
            log::debug!("dropping inline content outside a list item");
            return false;
        }
        self.open_paragraph(job, out);
        true
    }

    fn text(&mut self, token: &Token, job: &mut JobState, out: &mut ContentBuilder) {
        let visible = token.content.contains('\u{a0}') || !token.content.trim().is_empty();
        if !self.paragraph_open && !visible {
            return;
        }
        if !self.ensure_paragraph(job, out) {
            return;
        }
        let mut properties = String::new();
        if self.anchor_ref.is_some() {
            properties.push_str(r#"<w:rStyle w:val="Hyperlink"/>"#);
        }
        if let Some(record) =
            job.styles
                .resolve_record(&token.tags, self.default_id.as_ref(), &job.defaults)
        {
            properties.push_str(&record.text);
        }
        if properties.is_empty() {
            out.add("<w:r>");
        } else {
            out.add(&format!("<w:r><w:rPr>{properties}</w:rPr>"));
        }
        out.add(&format!(
            r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
            token.content
        ));
        self.paragraph_has_content = true;
    }

    fn anchor_begin(&mut self, href: &str, job: &mut JobState, out: &mut ContentBuilder) {
        if !self.ensure_paragraph(job, out) {
            return;
        }
        if self.anchor_depth == 0 {
            let url = validate_url(href, &job.config.default_url_on_error);
            let link = job.hyperlinks.get_or_create(&url);
            out.add(&format!(r#"<w:hyperlink r:id="{}">"#, link.id));
            self.anchor_ref = Some(link.id);
        }
        self.anchor_depth += 1;
        self.paragraph_has_content = true;
    }

    fn anchor_end(&mut self, out: &mut ContentBuilder) {
        match self.anchor_depth {
            0 => {}
            1 => {
                out.add("</w:hyperlink>");
                self.anchor_depth = 0;
                self.anchor_ref = None;
            }
            _ => self.anchor_depth -= 1,
        }
    }

    fn image(
        &mut self,
        src: &str,
        width: i32,
        height: i32,
        job: &mut JobState,
        out: &mut ContentBuilder,
    ) {
        if !self.ensure_paragraph(job, out) {
            return;
        }
        job.images.get_or_create(src);
        let src = src.to_string();
        let extent = |axis| Deferred::ImageExtent {
            src: src.clone(),
            width,
            height,
            axis,
            unit: LengthUnit::Emu,
        };
        let drawing_id = || Deferred::ImageDrawingId { src: src.clone() };

        out.add(r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx=""#);
        out.add_deferred(extent(Axis::Width));
        out.add(r#"" cy=""#);
        out.add_deferred(extent(Axis::Height));
        out.add(r#""/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id=""#);
        out.add_deferred(drawing_id());
        out.add(r#"" name="" descr="">"#);
        if let Some(link) = &self.anchor_ref {
            out.add(&format!(r#"<a:hlinkClick xmlns:a="{DRAWINGML_NS}" r:id="{link}"/>"#));
        }
        out.add(&format!(
            concat!(
                r#"</wp:docPr><wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="{ns}" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic xmlns:a="{ns}"><a:graphicData uri="{pic}"><pic:pic xmlns:pic="{pic}"><pic:nvPicPr><pic:cNvPr id=""#
            ),
            ns = DRAWINGML_NS,
            pic = PICTURE_NS
        ));
        out.add_deferred(drawing_id());
        out.add(r#"" name="" descr="">"#);
        if let Some(link) = &self.anchor_ref {
            out.add(&format!(r#"<a:hlinkClick r:id="{link}"/>"#));
        }
        out.add(r#"</pic:cNvPr><pic:cNvPicPr><a:picLocks noChangeAspect="1" noChangeArrowheads="1"/></pic:cNvPicPr></pic:nvPicPr><pic:blipFill><a:blip r:embed=""#);
        out.add_deferred(Deferred::ImageRelationshipId { src: src.clone() });
        out.add(r#""></a:blip><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr bwMode="auto"><a:xfrm><a:off x="0" y="0"/><a:ext cx=""#);
        out.add_deferred(extent(Axis::Width));
        out.add(r#"" cy=""#);
        out.add_deferred(extent(Axis::Height));
        out.add(r#""/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#);
        self.paragraph_has_content = true;
    }

    fn line_break(&mut self, job: &JobState, out: &mut ContentBuilder) {
        if self.paragraph_open {
            out.add("<w:r><w:br/></w:r>");
        } else if self.lists.last().is_some_and(|list| list.pending) {
            self.open_paragraph(job, out);
            out.add("<w:r><w:br/></w:r>");
        } else if self.lists.last().is_none_or(|list| list.item_open) {
            self.empty_paragraph(out);
        }
    }

    fn paragraph_begin(&mut self, job: &JobState, out: &mut ContentBuilder) {
        if self.anchor_depth > 0 {
            return;
        }
        if self.paragraph_open {
            if !self.paragraph_has_content {
                return;
            }
            self.close_paragraph(out);
        }
        if self.ensure_paragraph(job, out) {
            self.html_paragraph = self.lists.is_empty();
        }
    }

    fn paragraph_end(&mut self, out: &mut ContentBuilder) {
        if self.anchor_depth > 0 {
            return;
        }
        self.close_paragraph(out);
        if self.html_paragraph && self.lists.is_empty() {
            self.empty_paragraph(out);
        }
        self.html_paragraph = false;
    }

    fn list_begin(&mut self, ordered: bool, job: &mut JobState, out: &mut ContentBuilder) {
        self.flush_pending_item(job, out);
        self.close_paragraph(out);
        job.lists.enter_list(ordered);
        job.lists.inherit_font(&self.default.text);
        self.lists.push(OpenList::default());
    }

    fn list_end(&mut self, job: &mut JobState, out: &mut ContentBuilder) {
        if self.lists.is_empty() {
            log::debug!("ignoring list end without an open list");
            return;
        }
        self.flush_pending_item(job, out);
        self.close_paragraph(out);
        self.lists.pop();

        let shape = job.lists.current_shape();
        job.lists.leave_list();
        let numbered = shape
            .and_then(|index| job.lists.shape(index))
            .is_some_and(|shape| shape.items > 0);
        if self.lists.is_empty() && numbered {
            self.empty_paragraph(out);
        }
    }

    fn item_begin(&mut self, job: &mut JobState, out: &mut ContentBuilder) {
        if self.lists.is_empty() {
            log::debug!("ignoring list item outside a list");
            return;
        }
        self.item_end(job, out);
        job.lists.mark_item();
        if let Some(list) = self.lists.last_mut() {
            list.item_open = true;
            list.pending = true;
        }
    }

    fn item_end(&mut self, job: &JobState, out: &mut ContentBuilder) {
        if !self.lists.last().is_some_and(|list| list.item_open) {
            return;
        }
        self.flush_pending_item(job, out);
        self.close_paragraph(out);
        if let Some(list) = self.lists.last_mut() {
            list.item_open = false;
        }
    }

    fn finish(&mut self, job: &mut JobState, out: &mut ContentBuilder) {
        self.close_paragraph(out);
        while !self.lists.is_empty() {
            self.list_end(job, out);
        }
    }
}

impl Emitter for DocxEmitter {
    fn emit(&mut self, tokens: &[Token], job: &mut JobState, out: &mut ContentBuilder) {
        self.default = job.defaults.resolve(self.default_id.as_ref()).clone();

        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];
            if let Some(next) = token.skip_to {
                index = next;
                continue;
            }
            if starts_empty_list(tokens, index) {
                index += 2;
                continue;
            }
            match &token.kind {
                TokenKind::Text => self.text(token, job, out),
                TokenKind::Break => self.line_break(job, out),
                TokenKind::ParagraphBegin => self.paragraph_begin(job, out),
                TokenKind::ParagraphEnd => self.paragraph_end(out),
                TokenKind::AnchorBegin { href } => self.anchor_begin(href, job, out),
                TokenKind::AnchorEnd => self.anchor_end(out),
                TokenKind::Image { src, width, height } => {
                    self.image(src, *width, *height, job, out)
                }
                TokenKind::ListBegin { ordered } => self.list_begin(*ordered, job, out),
                TokenKind::ListEnd { .. } => self.list_end(job, out),
                TokenKind::ListItemBegin => self.item_begin(job, out),
                TokenKind::ListItemEnd => self.item_end(job, out),
            }
            index += 1;
        }
        self.finish(job, out);
    }
}

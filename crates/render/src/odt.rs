//! Emitter for the tree-shaped schema (OpenDocument `content.xml`).
//!
//! Lists nest as `text:list`/`text:list-item` children and styled text becomes
//! `text:span` elements referencing automatic styles.
use crate::builder::{ContentBuilder, Deferred};
use crate::emitter::{Emitter, starts_empty_list};
use pressmark_markup::{Token, TokenKind};
use pressmark_registry::{JobState, TemplateStyle, validate_url};
use pressmark_types::{Axis, DefaultStyleId, LengthUnit};

#[derive(Debug, Default)]
struct OpenList {
    item_open: bool,
    /// A `text:list-item` opened only to hold a nested list.
    wrapper: bool,
}

#[derive(Debug)]
pub struct OdtEmitter {
    default_id: Option<DefaultStyleId>,
    default: TemplateStyle,
    paragraph_open: bool,
    paragraph_has_content: bool,
    /// A top-level HTML `<p>` is open; its end is followed by a spacing paragraph.
    html_paragraph: bool,
    anchor_depth: usize,
    anchor_href: Option<String>,
    lists: Vec<OpenList>,
}

impl OdtEmitter {
    pub fn new(default_id: Option<&DefaultStyleId>) -> Self {
        Self {
            default_id: default_id.cloned(),
            default: TemplateStyle::default(),
            paragraph_open: false,
            paragraph_has_content: false,
            html_paragraph: false,
            anchor_depth: 0,
            anchor_href: None,
            lists: Vec::new(),
        }
    }

    fn paragraph_attribute(&self) -> String {
        if self.default.paragraph.is_empty() {
            String::new()
        } else {
            format!(" {}", self.default.paragraph)
        }
    }

    fn open_paragraph(&mut self, out: &mut ContentBuilder) {
        out.add(&format!("<text:p{}>", self.paragraph_attribute()));
        self.paragraph_open = true;
        self.paragraph_has_content = false;
    }

    fn close_paragraph(&mut self, out: &mut ContentBuilder) {
        if !self.paragraph_open {
            return;
        }
        if self.anchor_depth > 0 {
            out.add("</text:a>");
            self.anchor_depth = 0;
            self.anchor_href = None;
        }
        out.add("</text:p>");
        self.paragraph_open = false;
    }

    fn empty_paragraph(&self, out: &mut ContentBuilder) {
        if self.default.paragraph.is_empty() {
            out.add(r#"<text:p text:style-name="Standard"/>"#);
        } else {
            out.add(&format!("<text:p {}/>", self.default.paragraph));
        }
    }

    /// Opens a paragraph for inline content. Returns false when the content has
    /// nowhere to go (inside a list but outside any item).
    fn ensure_paragraph(&mut self, out: &mut ContentBuilder) -> bool {
        if self.paragraph_open {
            return true;
        }
        if let Some(list) = self.lists.last()
            && !list.item_open
        {
            log::debug!("dropping inline content outside a list item");
            return false;
        }
        self.open_paragraph(out);
        true
    }

    fn text(&mut self, token: &Token, job: &mut JobState, out: &mut ContentBuilder) {
        let visible = token.content.contains('\u{a0}') || !token.content.trim().is_empty();
        if !self.paragraph_open && !visible {
            return;
        }
        if !self.ensure_paragraph(out) {
            return;
        }
        let style = job
            .styles
            .resolve(&token.tags, self.default_id.as_ref(), &job.defaults);
        match style {
            Some(id) => out.add(&format!(
                r#"<text:span text:style-name="{}">{}</text:span>"#,
                id, token.content
            )),
            None => out.add(&format!("<text:span>{}</text:span>", token.content)),
        }
        self.paragraph_has_content = true;
    }

    fn anchor_begin(&mut self, href: &str, job: &JobState, out: &mut ContentBuilder) {
        if !self.ensure_paragraph(out) {
            return;
        }
        if self.anchor_depth == 0 {
            let url = validate_url(href, &job.config.default_url_on_error);
            out.add(&format!(r#"<text:a xlink:type="simple" xlink:href="{url}">"#));
            self.anchor_href = Some(url);
        }
        self.anchor_depth += 1;
        self.paragraph_has_content = true;
    }

    fn anchor_end(&mut self, out: &mut ContentBuilder) {
        match self.anchor_depth {
            0 => {}
            1 => {
                out.add("</text:a>");
                self.anchor_depth = 0;
                self.anchor_href = None;
            }
            _ => self.anchor_depth -= 1,
        }
    }

    fn image(&mut self, src: &str, width: i32, height: i32, job: &mut JobState, out: &mut ContentBuilder) {
        if !self.ensure_paragraph(out) {
            return;
        }
        job.images.get_or_create(src);
        let src = src.to_string();
        let extent = |axis| Deferred::ImageExtent {
            src: src.clone(),
            width,
            height,
            axis,
            unit: LengthUnit::Cm,
        };

        if let Some(href) = &self.anchor_href {
            out.add(&format!(r#"<draw:a xlink:type="simple" xlink:href="{href}">"#));
        }
        out.add(r#"<draw:frame draw:name="pressmark-image-"#);
        out.add_deferred(Deferred::ImageDrawingId { src: src.clone() });
        out.add(r#"" text:anchor-type="as-char" svg:width=""#);
        out.add_deferred(extent(Axis::Width));
        out.add(r#"cm" svg:height=""#);
        out.add_deferred(extent(Axis::Height));
        out.add(r#"cm" draw:z-index="0"><draw:image xlink:href=""#);
        out.add_deferred(Deferred::ImageHref { src: src.clone() });
        out.add(r#"" draw:mime-type=""#);
        out.add_deferred(Deferred::ImageMimeType { src: src.clone() });
        out.add(r#"" xlink:type="simple" xlink:show="embed" xlink:actuate="onLoad"/></draw:frame>"#);
        if self.anchor_href.is_some() {
            out.add("</draw:a>");
        }
        self.paragraph_has_content = true;
    }

    fn line_break(&mut self, out: &mut ContentBuilder) {
        if self.paragraph_open {
            out.add("<text:line-break/>");
        } else if self.lists.last().is_none_or(|list| list.item_open) {
            self.empty_paragraph(out);
        }
    }

    fn paragraph_begin(&mut self, out: &mut ContentBuilder) {
        if self.anchor_depth > 0 {
            return;
        }
        if self.paragraph_open {
            if !self.paragraph_has_content {
                return;
            }
            self.close_paragraph(out);
        }
        if self.ensure_paragraph(out) {
            self.paragraph_has_content = false;
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
        self.close_paragraph(out);
        let wrapper = match self.lists.last() {
            Some(parent) if !parent.item_open => {
                out.add("<text:list-item>");
                true
            }
            _ => false,
        };

        let depth = job.lists.enter_list(ordered);
        if depth == 0
            && let Some(shape) = job.lists.current_shape()
        {
            out.add("<text:list");
            out.add_deferred(Deferred::ListStyleName { shape });
            out.add(">");
        } else {
            out.add("<text:list>");
        }
        self.lists.push(OpenList {
            item_open: false,
            wrapper,
        });
    }

    fn list_end(&mut self, job: &mut JobState, out: &mut ContentBuilder) {
        let Some(list) = self.lists.pop() else {
            log::debug!("ignoring list end without an open list");
            return;
        };
        self.close_paragraph(out);
        if list.item_open {
            out.add("</text:list-item>");
        }
        out.add("</text:list>");
        job.lists.leave_list();
        if list.wrapper {
            out.add("</text:list-item>");
        }
    }

    fn item_begin(&mut self, job: &mut JobState, out: &mut ContentBuilder) {
        if self.lists.is_empty() {
            log::debug!("ignoring list item outside a list");
            return;
        }
        self.item_end(out);
        out.add("<text:list-item>");
        job.lists.mark_item();
        if let Some(list) = self.lists.last_mut() {
            list.item_open = true;
        }
    }

    fn item_end(&mut self, out: &mut ContentBuilder) {
        let open = self.lists.last().is_some_and(|list| list.item_open);
        if !open {
            return;
        }
        self.close_paragraph(out);
        out.add("</text:list-item>");
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

impl Emitter for OdtEmitter {
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
                TokenKind::Break => self.line_break(out),
                TokenKind::ParagraphBegin => self.paragraph_begin(out),
                TokenKind::ParagraphEnd => self.paragraph_end(out),
                TokenKind::AnchorBegin { href } => self.anchor_begin(href, job, out),
                TokenKind::AnchorEnd => self.anchor_end(out),
                TokenKind::Image { src, width, height } => {
                    self.image(src, *width, *height, job, out)
                }
                TokenKind::ListBegin { ordered } => self.list_begin(*ordered, job, out),
                TokenKind::ListEnd { .. } => self.list_end(job, out),
                TokenKind::ListItemBegin => self.item_begin(job, out),
                TokenKind::ListItemEnd => self.item_end(out),
            }
            index += 1;
        }
        self.finish(job, out);
    }
}

//! Compiles rich-text HTML into the markup of one of the two document schemas.
//!
//! [`render_html`] is the entry point: it tokenizes the input, picks the
//! emitter for the job's schema and returns a [`ContentBuilder`] whose deferred
//! parts are resolved once the job's images have been probed.
pub mod builder;
pub mod definitions;
pub mod docx;
pub mod emitter;
pub mod odt;

pub use builder::{ContentBuilder, Deferred, Element};
pub use definitions::{
    docx_abstract_numbers, docx_nums, docx_relationships, odt_automatic_styles,
};
pub use docx::DocxEmitter;
pub use emitter::Emitter;
pub use odt::OdtEmitter;

use pressmark_markup::parse_html;
use pressmark_registry::JobState;
use pressmark_types::{DefaultStyleId, Schema};

/// Compiles one HTML fragment, registering its styles, lists, hyperlinks and
/// images in `job`.
pub fn render_html(
    html: &str,
    job: &mut JobState,
    default_style: Option<&DefaultStyleId>,
) -> ContentBuilder {
    let tokens = parse_html(html);
    let mut out = ContentBuilder::new();
    let mut emitter: Box<dyn Emitter> = match job.schema() {
        Schema::Odt => Box::new(OdtEmitter::new(default_style)),
        Schema::Docx => Box::new(DocxEmitter::new(default_style)),
    };
    emitter.emit(&tokens, job, &mut out);
    log::debug!(
        "compiled {} tokens into {} elements",
        tokens.len(),
        out.elements().len()
    );
    out
}

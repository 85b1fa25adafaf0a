//! Per-job registries of the rich-text compiler: styles, list numbering,
//! hyperlinks and images, bundled in [`JobState`].
pub mod hyperlink;
pub mod image;
pub mod job;
pub mod numbering;
pub mod style;

pub use hyperlink::{DEFAULT_URL_ON_ERROR, HyperlinkDatabase, HyperlinkRef, validate_url};
pub use image::{ImageDatabase, ImageRecord, compute_extent};
pub use job::{DEFAULT_NUMBERING_BASE, DEFAULT_REFERENCE_PREFIX, JobConfig, JobState};
pub use numbering::{ListAllocator, ListLevel, ListShape, NumberingId};
pub use style::{DefaultStyleRegistry, StyleRecord, StyleRegistry, TemplateStyle, TextProperty};

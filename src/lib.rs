//! pressmark: compiles rich-text HTML into OpenDocument and WordprocessingML
//! markup and splices it into document templates.
//!
//! The compiler crates are re-exported; this crate adds the package model,
//! render options and the [`RenderJob`] pipeline.
pub mod data;
pub mod error;
pub mod options;
pub mod package;
pub mod pipeline;

pub use error::PipelineError;
pub use options::RenderOptions;
pub use package::{Package, PartData};
pub use pipeline::{RenderJob, is_content_part};

pub use pressmark_markup as markup;
pub use pressmark_registry as registry;
pub use pressmark_render as render;
pub use pressmark_splice as splice;
pub use pressmark_traits as traits;
pub use pressmark_types as types;

pub use pressmark_registry::{JobConfig, JobState};
pub use pressmark_render::{ContentBuilder, render_html};
pub use pressmark_traits::{ImageProbe, InMemoryImageProbe, ResourceError};
pub use pressmark_types::Schema;

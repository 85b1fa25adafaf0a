//! All registries of one render job, owned together.
use crate::hyperlink::{DEFAULT_URL_ON_ERROR, HyperlinkDatabase};
use crate::image::ImageDatabase;
use crate::numbering::ListAllocator;
use crate::style::{DefaultStyleRegistry, StyleRegistry};
use pressmark_types::Schema;

/// Default prefix of generated relationship ids and media file names.
pub const DEFAULT_REFERENCE_PREFIX: &str = "Pressmark";

/// First flat-schema numbering id, above what templates usually define.
pub const DEFAULT_NUMBERING_BASE: u32 = 1000;

/// Settings that shape the identifiers and fallbacks of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub schema: Schema,
    pub default_url_on_error: String,
    pub reference_prefix: String,
    pub numbering_base: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            default_url_on_error: DEFAULT_URL_ON_ERROR.to_string(),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            numbering_base: DEFAULT_NUMBERING_BASE,
        }
    }
}

impl JobConfig {
    pub fn for_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }
}

/// Per-job state passed by reference to every compiler component.
///
/// Nothing in here is shared between jobs, so concurrent jobs never interfere
/// and dropping the state discards everything the job registered.
#[derive(Debug)]
pub struct JobState {
    pub config: JobConfig,
    pub defaults: DefaultStyleRegistry,
    pub styles: StyleRegistry,
    pub lists: ListAllocator,
    pub hyperlinks: HyperlinkDatabase,
    pub images: ImageDatabase,
}

impl JobState {
    pub fn new(config: JobConfig) -> Self {
        Self {
            defaults: DefaultStyleRegistry::new(),
            styles: StyleRegistry::new(config.schema),
            lists: ListAllocator::new(config.schema, config.numbering_base),
            hyperlinks: HyperlinkDatabase::new(config.reference_prefix.clone()),
            images: ImageDatabase::new(config.reference_prefix.clone()),
            config,
        }
    }

    pub fn schema(&self) -> Schema {
        self.config.schema
    }
}

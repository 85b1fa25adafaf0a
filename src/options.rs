//! Options of a render job, loadable from JSON.
use crate::error::PipelineError;
use pressmark_registry::{DEFAULT_NUMBERING_BASE, DEFAULT_REFERENCE_PREFIX, DEFAULT_URL_ON_ERROR, JobConfig};
use pressmark_splice::DEFAULT_SPLICE_WINDOW;
use pressmark_types::Schema;
use serde::{Deserialize, Serialize};

/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub schema: Schema,
    /// Link target used when an anchor's href is not a usable URL.
    pub default_url_on_error: String,
    /// Prefix of generated relationship ids and media file names.
    pub reference_prefix: String,
    /// First numbering id of the flat schema.
    pub numbering_base: u32,
    /// Bytes searched on each side of a marker for its paragraph.
    pub splice_window: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            default_url_on_error: DEFAULT_URL_ON_ERROR.to_string(),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            numbering_base: DEFAULT_NUMBERING_BASE,
            splice_window: DEFAULT_SPLICE_WINDOW,
        }
    }
}

impl RenderOptions {
    pub fn for_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The registry settings of a job run with these options.
    pub fn job_config(&self) -> JobConfig {
        JobConfig {
            schema: self.schema,
            default_url_on_error: self.default_url_on_error.clone(),
            reference_prefix: self.reference_prefix.clone(),
            numbering_base: self.numbering_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        assert_eq!(RenderOptions::from_json("{}").unwrap(), RenderOptions::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let options = RenderOptions::from_json(
            r#"{"schema": "odt", "defaultUrlOnError": "https://x.test", "numberingBase": 5, "spliceWindow": 10}"#,
        )
        .unwrap();
        assert_eq!(options.schema, Schema::Odt);
        assert_eq!(options.splice_window, 10);
        assert_eq!(options.reference_prefix, "Pressmark");

        let config = options.job_config();
        assert_eq!(config.default_url_on_error, "https://x.test");
        assert_eq!(config.numbering_base, 5);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = RenderOptions::from_json(r#"{"schema": "pdf"}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Options(_)));
    }
}

//! Hyperlink targets and their relationship ids.
use indexmap::IndexMap;
use pressmark_markup::escape_text;
use regex::Regex;
use std::sync::LazyLock;

/// Target used when an anchor's href cannot be turned into a URL.
pub const DEFAULT_URL_ON_ERROR: &str = "about:blank";

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("BUG: invalid SCHEME_RE regex literal")
});

/// Normalizes a raw href into an XML-escaped link target.
///
/// Targets with a scheme are kept, `www.` hosts get `https://`, anything else
/// is replaced by `default_on_error`.
pub fn validate_url(raw: &str, default_on_error: &str) -> String {
    let trimmed = raw.trim();
    let target = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else if trimmed.to_ascii_lowercase().starts_with("www.") {
        format!("https://{trimmed}")
    } else {
        log::debug!("invalid link target '{}', using '{}'", raw, default_on_error);
        default_on_error.to_string()
    };
    escape_text(&target)
}

/// A hyperlink registered for the flat schema's relationship part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRef {
    /// Zero-based position in first-seen order.
    pub index: usize,
    /// Relationship id, `<Prefix>HyperlinkId<N>`.
    pub id: String,
    /// Escaped target URL.
    pub target: String,
}

impl HyperlinkRef {
    pub fn to_relationship(&self) -> String {
        format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{}" TargetMode="External"/>"#,
            self.id, self.target
        )
    }
}

/// Per-job map from validated targets to relationship ids.
#[derive(Debug)]
pub struct HyperlinkDatabase {
    prefix: String,
    links: IndexMap<String, HyperlinkRef>,
}

impl HyperlinkDatabase {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            links: IndexMap::new(),
        }
    }

    /// Returns the reference for an already validated target, creating it once.
    pub fn get_or_create(&mut self, url: &str) -> HyperlinkRef {
        let index = self.links.len();
        let prefix = &self.prefix;
        self.links
            .entry(url.to_string())
            .or_insert_with(|| HyperlinkRef {
                index,
                id: format!("{prefix}HyperlinkId{index}"),
                target: url.to_string(),
            })
            .clone()
    }

    pub fn get(&self, url: &str) -> Option<&HyperlinkRef> {
        self.links.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HyperlinkRef> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

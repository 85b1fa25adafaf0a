//! Rich-text markers in template XML and the placeholders that replace them.
use pressmark_types::DefaultStyleId;
use regex::Regex;
use std::sync::LazyLock;

/// Neutral element wrapping a placeholder until post-processing.
pub const WRAPPER_TAG: &str = "pressmark";

/// `{path:html...}`, capturing the data path.
pub(crate) static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]*?):html[^{}]*?\}").expect("BUG: invalid MARKER_RE regex literal")
});

static INVOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\s*([^{}:]+?)\s*:html(?:\('([^']*)'\))?\}$")
        .expect("BUG: invalid INVOCATION_RE regex literal")
});

static WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("</?{WRAPPER_TAG}>")).expect("BUG: invalid WRAPPER_RE regex literal")
});

/// A rich-text placeholder: the data path and the template's default style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub path: String,
    pub default_style: Option<DefaultStyleId>,
}

impl Invocation {
    pub fn new(path: impl Into<String>, default_style: Option<DefaultStyleId>) -> Self {
        Self {
            path: path.into(),
            default_style,
        }
    }

    /// `{path:html}` or `{path:html('id')}`.
    pub fn to_marker(&self) -> String {
        match &self.default_style {
            Some(id) => format!("{{{}:html('{}')}}", self.path, id),
            None => format!("{{{}:html}}", self.path),
        }
    }

    /// The marker inside its neutral wrapper element.
    pub fn to_placeholder(&self) -> String {
        format!("<{WRAPPER_TAG}>{}</{WRAPPER_TAG}>", self.to_marker())
    }
}

/// Decodes a placeholder marker back into its path and default style id.
pub fn parse_invocation(text: &str) -> Option<Invocation> {
    let caps = INVOCATION_RE.captures(text.trim())?;
    let default_style = caps
        .get(2)
        .map(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(DefaultStyleId::from);
    Some(Invocation::new(&caps[1], default_style))
}

/// Removes the neutral wrapper elements, keeping what they enclose.
pub fn strip_placeholder_wrappers(xml: &str) -> String {
    WRAPPER_RE.replace_all(xml, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_pattern() {
        let xml = "a {d.body:html} b {d.title} c {d.note:html:ifEmpty}";
        let paths: Vec<_> = MARKER_RE
            .captures_iter(xml)
            .map(|caps| caps[1].to_string())
            .collect();
        assert_eq!(paths, vec!["d.body", "d.note"]);
    }

    #[test]
    fn test_parse_invocation() {
        assert_eq!(
            parse_invocation("{d.body:html}"),
            Some(Invocation::new("d.body", None))
        );
        assert_eq!(
            parse_invocation("{d.items[0].text:html('style-fs24')}"),
            Some(Invocation::new(
                "d.items[0].text",
                Some(DefaultStyleId::from("style-fs24"))
            ))
        );
        assert_eq!(parse_invocation("{d.body}"), None);
        assert_eq!(parse_invocation("plain"), None);
    }

    #[test]
    fn test_placeholder_round_trip() {
        let invocation = Invocation::new("d.x", Some(DefaultStyleId::from("style-P1")));
        let placeholder = invocation.to_placeholder();
        assert_eq!(placeholder, "<pressmark>{d.x:html('style-P1')}</pressmark>");
        assert_eq!(parse_invocation(&strip_placeholder_wrappers(&placeholder)), Some(invocation));
    }

    #[test]
    fn test_strip_wrappers() {
        assert_eq!(
            strip_placeholder_wrappers("<w:body><pressmark><w:p/></pressmark></w:body>"),
            "<w:body><w:p/></w:body>"
        );
    }
}

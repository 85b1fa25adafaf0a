//! The two document schemas the rich-text compiler targets.
use serde::{Deserialize, Serialize};

/// Target document markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// OpenDocument text. Lists and spans nest as XML children.
    Odt,
    /// WordprocessingML. Lists are flat paragraphs with numbering properties.
    #[default]
    Docx,
}

impl Schema {
    /// Resolves a schema from a file extension (`"odt"`, `"docx"`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "odt" => Some(Schema::Odt),
            "docx" => Some(Schema::Docx),
            _ => None,
        }
    }

    /// Opening paragraph tags searched for around a marker.
    pub fn paragraph_open_tags(self) -> &'static [&'static str] {
        match self {
            Schema::Odt => &["<text:p", "<text:h"],
            Schema::Docx => &["<w:p"],
        }
    }

    /// Closing tag matching `paragraph_open_tags()[index]`.
    pub fn paragraph_close_tag(self, index: usize) -> &'static str {
        match self {
            Schema::Odt if index == 1 => "</text:h>",
            Schema::Odt => "</text:p>",
            Schema::Docx => "</w:p>",
        }
    }

    /// File extension of packages written in this schema.
    pub fn extension(self) -> &'static str {
        match self {
            Schema::Odt => "odt",
            Schema::Docx => "docx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Schema::from_extension("odt"), Some(Schema::Odt));
        assert_eq!(Schema::from_extension(".DOCX"), Some(Schema::Docx));
        assert_eq!(Schema::from_extension("xlsx"), None);
    }

    #[test]
    fn test_paragraph_tags() {
        assert_eq!(Schema::Docx.paragraph_open_tags(), &["<w:p"]);
        assert_eq!(Schema::Odt.paragraph_close_tag(1), "</text:h>");
        assert_eq!(Schema::Odt.paragraph_close_tag(0), "</text:p>");
    }

    #[test]
    fn test_deserialize() {
        let schema: Schema = serde_json::from_str("\"odt\"").unwrap();
        assert_eq!(schema, Schema::Odt);
    }
}

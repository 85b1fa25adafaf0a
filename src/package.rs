//! In-memory document package: named parts in their original order.
//!
//! Reading and writing the zip container is left to the caller; the pipeline
//! only edits part contents and adds media parts.
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartData {
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    parts: IndexMap<String, PartData>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Package::insert_text`].
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_text(name, text);
        self
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.parts.insert(name.into(), PartData::Text(text.into()));
    }

    pub fn insert_binary(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.parts.insert(name.into(), PartData::Binary(data));
    }

    pub fn get(&self, name: &str) -> Option<&PartData> {
        self.parts.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.parts.get(name)? {
            PartData::Text(text) => Some(text),
            PartData::Binary(_) => None,
        }
    }

    pub fn text_mut(&mut self, name: &str) -> Option<&mut String> {
        match self.parts.get_mut(name)? {
            PartData::Text(text) => Some(text),
            PartData::Binary(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Names of the text parts accepted by `filter`, in package order.
    pub fn text_parts_where(&self, filter: impl Fn(&str) -> bool) -> Vec<String> {
        self.parts
            .iter()
            .filter(|(name, data)| matches!(data, PartData::Text(_)) && filter(name))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_keep_order_and_kind() {
        let mut package = Package::new()
            .with_text("word/document.xml", "<w:document/>")
            .with_text("word/header1.xml", "<w:hdr/>");
        package.insert_binary("word/media/a.png", vec![1, 2, 3]);

        assert_eq!(package.len(), 3);
        assert_eq!(package.text("word/document.xml"), Some("<w:document/>"));
        assert_eq!(package.text("word/media/a.png"), None);
        assert_eq!(
            package.text_parts_where(|name| name.starts_with("word/")),
            vec!["word/document.xml", "word/header1.xml"]
        );

        package.text_mut("word/header1.xml").unwrap().push_str("<!-- -->");
        assert_eq!(package.text("word/header1.xml"), Some("<w:hdr/><!-- -->"));
    }
}

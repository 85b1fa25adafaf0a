//! Content-addressed text styles and the default styles inherited from templates.
use indexmap::IndexMap;
use itertools::Itertools;
use pressmark_types::{DefaultStyleId, Schema, StyleId};

/// Paragraph and text property fragments taken from the template around a marker.
///
/// For the flat schema both fields hold `w:pPr`/`w:rPr` children, for the tree
/// schema `paragraph` is a `text:style-name` attribute and `text` a list of
/// `style:text-properties` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStyle {
    pub paragraph: String,
    pub text: String,
}

impl TemplateStyle {
    pub fn is_empty(&self) -> bool {
        self.paragraph.is_empty() && self.text.is_empty()
    }
}

static EMPTY_STYLE: TemplateStyle = TemplateStyle {
    paragraph: String::new(),
    text: String::new(),
};

/// Default styles registered by the marker splicer, keyed by their id.
#[derive(Debug, Default)]
pub struct DefaultStyleRegistry {
    styles: IndexMap<DefaultStyleId, TemplateStyle>,
}

impl DefaultStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default style. The first registration of an id wins.
    pub fn register(&mut self, id: DefaultStyleId, style: TemplateStyle) -> bool {
        if self.styles.contains_key(&id) {
            return false;
        }
        self.styles.insert(id, style);
        true
    }

    pub fn get(&self, id: &DefaultStyleId) -> Option<&TemplateStyle> {
        self.styles.get(id)
    }

    /// The style behind `id`, or an empty style when the id is absent or unknown.
    pub fn resolve(&self, id: Option<&DefaultStyleId>) -> &TemplateStyle {
        match id.and_then(|id| self.styles.get(id)) {
            Some(style) => style,
            None => {
                if let Some(id) = id {
                    log::debug!("unknown default style '{}', using none", id);
                }
                &EMPTY_STYLE
            }
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Text properties an HTML tag can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextProperty {
    Bold,
    Italic,
    Underline,
    Strike,
}

impl TextProperty {
    /// Fixed tag table. Unknown tags contribute nothing.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" | "strong" => Some(TextProperty::Bold),
            "i" | "em" => Some(TextProperty::Italic),
            "u" => Some(TextProperty::Underline),
            "s" | "del" => Some(TextProperty::Strike),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TextProperty::Bold => "b",
            TextProperty::Italic => "i",
            TextProperty::Underline => "u",
            TextProperty::Strike => "s",
        }
    }

    pub fn fragment(self, schema: Schema) -> &'static str {
        match (schema, self) {
            (Schema::Docx, TextProperty::Bold) => "<w:b/><w:bCs/>",
            (Schema::Docx, TextProperty::Italic) => "<w:i/><w:iCs/>",
            (Schema::Docx, TextProperty::Underline) => r#"<w:u w:val="single"/>"#,
            (Schema::Docx, TextProperty::Strike) => "<w:strike/>",
            (Schema::Odt, TextProperty::Bold) => r#"fo:font-weight="bold""#,
            (Schema::Odt, TextProperty::Italic) => r#"fo:font-style="italic""#,
            (Schema::Odt, TextProperty::Underline) => r#"style:text-underline-style="solid""#,
            (Schema::Odt, TextProperty::Strike) => r#"style:text-line-through-style="solid""#,
        }
    }
}

/// Contributing properties of a tag stack, deduplicated in first-seen order.
pub fn tag_properties(tags: &[String]) -> Vec<TextProperty> {
    tags.iter()
        .filter_map(|tag| TextProperty::from_tag(tag))
        .unique()
        .collect()
}

/// Joins property fragments the way the schema expects.
pub fn join_fragments<'a>(schema: Schema, fragments: impl IntoIterator<Item = &'a str>) -> String {
    let mut parts = fragments.into_iter().map(str::trim).filter(|f| !f.is_empty());
    match schema {
        Schema::Odt => parts.join(" "),
        Schema::Docx => parts.collect(),
    }
}

/// A registered text style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub id: StyleId,
    pub paragraph: String,
    pub text: String,
}

impl StyleRecord {
    /// `office:automatic-styles` entry for the tree schema.
    pub fn to_odt_definition(&self) -> String {
        format!(
            r#"<style:style style:name="{}" style:family="text"><style:text-properties {}/></style:style>"#,
            self.id, self.text
        )
    }
}

/// Per-job text style registry.
///
/// Records are keyed by the contributing tag properties plus the default style id,
/// so a given combination is registered once and keeps its id for the whole job.
#[derive(Debug)]
pub struct StyleRegistry {
    schema: Schema,
    records: IndexMap<String, StyleRecord>,
}

impl StyleRegistry {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: IndexMap::new(),
        }
    }

    /// Returns the style for a tag stack under an optional default style.
    ///
    /// `None` when neither the tags nor the default text contribute anything.
    pub fn resolve(
        &mut self,
        tags: &[String],
        default_id: Option<&DefaultStyleId>,
        defaults: &DefaultStyleRegistry,
    ) -> Option<StyleId> {
        self.resolve_record(tags, default_id, defaults)
            .map(|record| record.id.clone())
    }

    /// Like [`StyleRegistry::resolve`], but hands back the whole record.
    pub fn resolve_record(
        &mut self,
        tags: &[String],
        default_id: Option<&DefaultStyleId>,
        defaults: &DefaultStyleRegistry,
    ) -> Option<&StyleRecord> {
        let properties = tag_properties(tags);
        let default = defaults.resolve(default_id);
        if properties.is_empty() && default.text.is_empty() {
            return None;
        }

        let key = format!(
            "{}|{}",
            properties.iter().map(|p| p.key()).join("+"),
            default_id.map(DefaultStyleId::as_str).unwrap_or_default()
        );
        let next = self.records.len() + 1;
        let schema = self.schema;
        let record = self.records.entry(key).or_insert_with(|| {
            let tag_text = join_fragments(schema, properties.iter().map(|p| p.fragment(schema)));
            StyleRecord {
                id: StyleId::from(format!("TC{next}")),
                paragraph: default.paragraph.clone(),
                text: join_fragments(schema, [default.text.as_str(), tag_text.as_str()]),
            }
        });
        Some(&*record)
    }

    pub fn records(&self) -> impl Iterator<Item = &StyleRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Accumulates emitted markup until the job's side inputs are known.
//!
//! Fragments that depend on image metadata or on the final list numbering are
//! stored as [`Deferred`] units with their arguments captured explicitly, and
//! only turned into text by [`ContentBuilder::build`].
use pressmark_registry::{JobState, compute_extent};
use pressmark_types::{Axis, LengthUnit};

/// A fragment resolved against the job state at flush time.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// One side of an inline image, formatted in `unit`.
    ImageExtent {
        src: String,
        width: i32,
        height: i32,
        axis: Axis,
        unit: LengthUnit,
    },
    /// Numeric id of an image, unique per job.
    ImageDrawingId { src: String },
    /// Relationship id of an image in the flat schema.
    ImageRelationshipId { src: String },
    /// Package path of an image in the tree schema.
    ImageHref { src: String },
    ImageMimeType { src: String },
    /// ` text:style-name="LC<n>"` when the shape numbered at least one item.
    ListStyleName { shape: usize },
}

impl Deferred {
    fn resolve(&self, job: &JobState) -> String {
        match self {
            Deferred::ImageExtent {
                src,
                width,
                height,
                axis,
                unit,
            } => {
                let info = job.images.get(src).and_then(|record| record.info.as_ref());
                unit.format(compute_extent(info, *width, *height, *axis, *unit))
            }
            Deferred::ImageDrawingId { src } => job
                .images
                .get(src)
                .map(|record| record.number.to_string())
                .unwrap_or_else(|| "0".to_string()),
            Deferred::ImageRelationshipId { src } => job
                .images
                .get(src)
                .map(|record| job.images.relationship_id(record))
                .unwrap_or_default(),
            Deferred::ImageHref { src } => job
                .images
                .get(src)
                .map(|record| format!("Pictures/{}", job.images.file_name(record)))
                .unwrap_or_default(),
            Deferred::ImageMimeType { src } => job
                .images
                .get(src)
                .and_then(|record| record.info.as_ref())
                .map(|info| info.mime_type.clone())
                .unwrap_or_default(),
            Deferred::ListStyleName { shape } => match job.lists.shape(*shape) {
                Some(shape) if shape.items > 0 => format!(r#" text:style-name="{}""#, shape.id),
                _ => String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Literal(String),
    Deferred(Deferred),
}

/// Ordered list of literal and deferred fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentBuilder {
    elements: Vec<Element>,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal markup, merged into the previous literal when possible.
    pub fn add(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        match self.elements.last_mut() {
            Some(Element::Literal(last)) => last.push_str(fragment),
            _ => self.elements.push(Element::Literal(fragment.to_string())),
        }
    }

    pub fn add_deferred(&mut self, unit: Deferred) {
        self.elements.push(Element::Deferred(unit));
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolves deferred units in insertion order and concatenates everything.
    ///
    /// Call once the job's registries are final; the output only changes if
    /// the job state does.
    pub fn build(&self, job: &JobState) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                Element::Literal(text) => out.push_str(text),
                Element::Deferred(unit) => out.push_str(&unit.resolve(job)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressmark_registry::JobConfig;
    use pressmark_types::{ImageInfo, PX_UNSET, Schema};

    #[test]
    fn test_adjacent_literals_are_merged() {
        let mut builder = ContentBuilder::new();
        builder.add("<w:p>");
        builder.add("</w:p>");
        builder.add("");
        assert_eq!(builder.elements().len(), 1);

        builder.add_deferred(Deferred::ImageDrawingId { src: "a.png".into() });
        builder.add("<w:p/>");
        assert_eq!(builder.elements().len(), 3);
    }

    #[test]
    fn test_build_resolves_images_after_attach() {
        let mut job = JobState::new(JobConfig::default());
        job.images.get_or_create("a.png");

        let mut builder = ContentBuilder::new();
        builder.add("cx=\"");
        builder.add_deferred(Deferred::ImageExtent {
            src: "a.png".into(),
            width: PX_UNSET,
            height: PX_UNSET,
            axis: Axis::Width,
            unit: LengthUnit::Emu,
        });
        builder.add("\" r:embed=\"");
        builder.add_deferred(Deferred::ImageRelationshipId { src: "a.png".into() });
        builder.add("\"");

        assert_eq!(builder.build(&job), r#"cx="0" r:embed="PressmarkImageId1""#);

        job.images.attach("a.png", ImageInfo::new(100, 50, "png"));
        assert_eq!(builder.build(&job), r#"cx="952500" r:embed="PressmarkImageId1""#);
        assert_eq!(builder.build(&job), builder.build(&job));
    }

    #[test]
    fn test_list_style_name_needs_items() {
        let mut job = JobState::new(JobConfig::for_schema(Schema::Odt));
        job.lists.enter_list(false);
        let mut builder = ContentBuilder::new();
        builder.add("<text:list");
        builder.add_deferred(Deferred::ListStyleName { shape: 0 });
        builder.add(">");
        assert_eq!(builder.build(&job), "<text:list>");

        job.lists.mark_item();
        assert_eq!(builder.build(&job), r#"<text:list text:style-name="LC1">"#);
    }

    #[test]
    fn test_odt_image_href_and_mime() {
        let mut job = JobState::new(JobConfig::for_schema(Schema::Odt));
        job.images.get_or_create("logo.jpeg");
        job.images.attach("logo.jpeg", ImageInfo::new(1, 1, "jpeg"));
        let mut builder = ContentBuilder::new();
        builder.add_deferred(Deferred::ImageHref { src: "logo.jpeg".into() });
        builder.add(" ");
        builder.add_deferred(Deferred::ImageMimeType { src: "logo.jpeg".into() });
        assert_eq!(builder.build(&job), "Pictures/PressmarkImage1.jpeg image/jpeg");
    }
}

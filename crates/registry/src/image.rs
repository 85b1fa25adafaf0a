//! Images referenced from rich text, and the sizing rules applied at flush time.
use indexmap::IndexMap;
use pressmark_types::{Axis, ImageInfo, LengthUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// One-based number in first-seen order.
    pub number: usize,
    pub src: String,
    /// Filled in by the probe step; `None` until then or when probing failed.
    pub info: Option<ImageInfo>,
}

/// Per-job map from image sources to records.
#[derive(Debug)]
pub struct ImageDatabase {
    prefix: String,
    records: IndexMap<String, ImageRecord>,
}

impl ImageDatabase {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            records: IndexMap::new(),
        }
    }

    /// Registers a source and returns its number.
    pub fn get_or_create(&mut self, src: &str) -> usize {
        let number = self.records.len() + 1;
        self.records
            .entry(src.to_string())
            .or_insert_with(|| ImageRecord {
                number,
                src: src.to_string(),
                info: None,
            })
            .number
    }

    /// Attaches probe results to a registered source.
    pub fn attach(&mut self, src: &str, info: ImageInfo) -> bool {
        match self.records.get_mut(src) {
            Some(record) => {
                record.info = Some(info);
                true
            }
            None => {
                log::debug!("ignoring metadata for unregistered image '{}'", src);
                false
            }
        }
    }

    pub fn get(&self, src: &str) -> Option<&ImageRecord> {
        self.records.get(src)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    pub fn sources(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Relationship id, `<Prefix>ImageId<N>`.
    pub fn relationship_id(&self, record: &ImageRecord) -> String {
        format!("{}ImageId{}", self.prefix, record.number)
    }

    /// Media file name, `<Prefix>Image<N>.<ext>` (no extension before probing).
    pub fn file_name(&self, record: &ImageRecord) -> String {
        match record.info.as_ref().map(|info| info.extension.as_str()) {
            Some(ext) if !ext.is_empty() => format!("{}Image{}.{}", self.prefix, record.number, ext),
            _ => format!("{}Image{}", self.prefix, record.number),
        }
    }

    /// `Relationship` entry pointing at the media file of the flat schema.
    pub fn to_relationship(&self, record: &ImageRecord) -> String {
        format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
            self.relationship_id(record),
            self.file_name(record)
        )
    }
}

/// Computes one side of an image in `unit`.
///
/// `width`/`height` are the pixel sizes requested in the HTML (negative when
/// unset). With both set they are used as is; with one set the other follows
/// the natural aspect ratio; with none the natural size is used, scaled down so
/// the longest side fits the unit's default maximum. Without metadata the
/// requested value, or zero, is returned.
pub fn compute_extent(
    info: Option<&ImageInfo>,
    width: i32,
    height: i32,
    axis: Axis,
    unit: LengthUnit,
) -> f64 {
    let requested = |px: i32| (px >= 0).then(|| unit.from_px(px as f64));
    let (w, h) = (requested(width), requested(height));
    let wanted = match axis {
        Axis::Width => w,
        Axis::Height => h,
    };
    let ratio = info.and_then(ImageInfo::aspect_ratio);

    match (w, h, ratio) {
        (Some(_), Some(_), _) => wanted.unwrap_or(0.0),
        (Some(w), None, Some(ratio)) => match axis {
            Axis::Width => w,
            Axis::Height => w / ratio,
        },
        (None, Some(h), Some(ratio)) => match axis {
            Axis::Width => h * ratio,
            Axis::Height => h,
        },
        (None, None, Some(_)) => match info {
            Some(info) => natural_extent(info, axis, unit),
            None => 0.0,
        },
        _ => wanted.unwrap_or(0.0),
    }
}

fn natural_extent(info: &ImageInfo, axis: Axis, unit: LengthUnit) -> f64 {
    let natural_w = unit.from_px(info.width_px as f64);
    let natural_h = unit.from_px(info.height_px as f64);
    let longest = natural_w.max(natural_h);
    let scale = if longest > unit.default_max_side() {
        unit.default_max_side() / longest
    } else {
        1.0
    };
    match axis {
        Axis::Width => natural_w * scale,
        Axis::Height => natural_h * scale,
    }
}

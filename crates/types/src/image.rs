//! Image metadata and length units used when sizing inline pictures.
use std::sync::Arc;

/// Sentinel for a width or height that was not given in the HTML.
pub const PX_UNSET: i32 = -1;

/// English Metric Units per CSS pixel (96 dpi).
pub const EMU_PER_PX: f64 = 914_400.0 / 96.0;

/// Centimetres per CSS pixel.
pub const CM_PER_PX: f64 = 0.0265;

/// EMU per centimetre.
pub const EMU_PER_CM: f64 = 360_000.0;

/// Reference-counted image bytes.
pub type SharedImageData = Arc<Vec<u8>>;

/// What the external fetch/probe step learned about an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width_px: u32,
    pub height_px: u32,
    /// File extension without the dot (`png`, `jpeg`, ...).
    pub extension: String,
    pub mime_type: String,
    /// Raw bytes, written into the package when present.
    pub data: Option<SharedImageData>,
}

impl ImageInfo {
    pub fn new(width_px: u32, height_px: u32, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let mime_type = mime_type_for(&extension).to_string();
        Self {
            width_px,
            height_px,
            extension,
            mime_type,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(Arc::new(data));
        self
    }

    /// Natural width divided by natural height, if both are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width_px == 0 || self.height_px == 0 {
            None
        } else {
            Some(self.width_px as f64 / self.height_px as f64)
        }
    }
}

/// Guesses a mime type from a file extension.
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

/// Length unit a size is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// English Metric Units, written as floored integers.
    Emu,
    /// Centimetres, written with three decimals at most.
    Cm,
}

impl LengthUnit {
    pub fn from_px(self, px: f64) -> f64 {
        match self {
            LengthUnit::Emu => px * EMU_PER_PX,
            LengthUnit::Cm => px * CM_PER_PX,
        }
    }

    /// The largest side given to an image with no requested size (5 cm).
    pub fn default_max_side(self) -> f64 {
        match self {
            LengthUnit::Emu => 5.0 * EMU_PER_CM,
            LengthUnit::Cm => 5.0,
        }
    }

    /// Formats a length the way the target markup expects it.
    pub fn format(self, value: f64) -> String {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        match self {
            LengthUnit::Emu => format!("{}", value.floor() as u64),
            LengthUnit::Cm => {
                let rounded = (value * 1000.0).round() / 1000.0;
                format!("{}", rounded)
            }
        }
    }
}

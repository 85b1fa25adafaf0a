//! ImageProbe trait for abstracting the image fetch/measure step.
//!
//! The rich-text compiler never performs I/O. Images referenced from HTML are
//! registered by source, and their pixel size, extension and bytes are supplied
//! afterwards by an `ImageProbe` at the single join point of a render job.

use pressmark_types::ImageInfo;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for image probing operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Resolves an image source (URL or data URI) into its metadata.
///
/// # Implementations
///
/// - `InMemoryImageProbe`: answers from pre-populated metadata (always available)
///
/// # Example
///
/// ```ignore
/// let probe = InMemoryImageProbe::new();
/// probe.add("https://x.test/logo.png", ImageInfo::new(120, 40, "png"))?;
/// job.resolve_images(&probe);
/// ```
pub trait ImageProbe: Send + Sync + Debug {
    /// Returns the metadata of the image behind `src`.
    fn probe(&self, src: &str) -> Result<ImageInfo, ResourceError>;

    /// Returns a human-readable name for this probe (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory image probe.
///
/// Metadata must be pre-populated before use.
#[derive(Debug, Default)]
pub struct InMemoryImageProbe {
    images: RwLock<HashMap<String, ImageInfo>>,
}

impl InMemoryImageProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the metadata of one image source.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, src: impl Into<String>, info: ImageInfo) -> Result<(), ResourceError> {
        let src = src.into();
        let mut images = self.images.write().map_err(|_| ResourceError::LoadFailed {
            path: src.clone(),
            message: "image store lock poisoned".to_string(),
        })?;
        images.insert(src, info);
        Ok(())
    }

    /// Get the number of known images.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.images.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageProbe for InMemoryImageProbe {
    fn probe(&self, src: &str) -> Result<ImageInfo, ResourceError> {
        let images = self.images.read().map_err(|_| ResourceError::LoadFailed {
            path: src.to_string(),
            message: "image store lock poisoned".to_string(),
        })?;
        images
            .get(src)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(src.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryImageProbe"
    }
}

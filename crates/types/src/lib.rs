//! Shared domain types for the pressmark crates.

pub mod ids;
pub mod image;
pub mod schema;

pub use ids::{DefaultStyleId, StyleId};
pub use image::{Axis, ImageInfo, LengthUnit, SharedImageData, PX_UNSET};
pub use schema::Schema;

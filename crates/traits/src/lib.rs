pub mod resource;

pub use resource::{ImageProbe, InMemoryImageProbe, ResourceError};

//! Newtype wrappers for generated identifiers and reference keys
//!
//! These types keep the different kinds of string identifiers produced during a
//! render job (style names and default-style keys) from being mixed up.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// A generated style name (e.g. `TC1`), unique within one render job
    StyleId
);

string_id!(
    /// The key of a default style extracted from the template around a marker
    /// (e.g. `style-ffArial-fs24`)
    DefaultStyleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_id_creation() {
        let id1 = StyleId::new("TC0");
        let id2 = StyleId::from("TC0");
        let id3 = StyleId::from(String::from("TC0"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "TC0");
        assert_eq!(id1.to_string(), "TC0");
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut defaults = HashMap::new();
        defaults.insert(DefaultStyleId::new("style-fs24"), 0usize);
        defaults.insert(DefaultStyleId::new("style-ffArial"), 1usize);

        assert_eq!(defaults.get(&DefaultStyleId::from("style-ffArial")), Some(&1));
        assert_eq!(defaults.get(&DefaultStyleId::new("missing")), None);
    }
}

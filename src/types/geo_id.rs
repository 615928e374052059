use std::{fmt, sync::Arc};

/// Stable key for a state or county.
/// Keeps the FIPS text as given (leading zeros included) without repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoId(Arc<str>); // e.g., "01" for a state, "01001" for a county

impl GeoId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// True if `parent`'s id is a strict string prefix of this id.
    /// Counties are tied to their state only through this relationship.
    pub fn is_within(&self, parent: &GeoId) -> bool {
        self.0.len() > parent.0.len() && self.0.starts_with(&*parent.0)
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeoId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for GeoId {
    fn from(id: String) -> Self { Self(Arc::from(id)) }
}

//! Comparison path roots

use serde::{Deserialize, Serialize};

/// Identity metadata path
pub(crate) const ID_PATH: &str = "_id";

/// Creation-time metadata path
pub(crate) const CREATION_TIME_PATH: &str = "_creationTimeUnix";

/// Last-update-time metadata path
pub(crate) const LAST_UPDATE_TIME_PATH: &str = "_lastUpdateTimeUnix";

/// Path to the property or metadata field a comparison applies to.
///
/// A single segment addresses a direct property; multiple segments walk a
/// cross-reference chain ending at the referenced property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPath {
    pub(crate) segments: Vec<String>,
}

impl FilterPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Root a comparison at a direct property
pub fn property(name: impl Into<String>) -> FilterPath {
    FilterPath {
        segments: vec![name.into()],
    }
}

/// Root a comparison at a cross-reference chain
pub fn reference<I, S>(segments: I) -> FilterPath
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FilterPath {
        segments: segments.into_iter().map(Into::into).collect(),
    }
}

/// Root a comparison at the object id
pub fn uuid() -> FilterPath {
    property(ID_PATH)
}

/// Root a comparison at the object creation time
pub fn created_at() -> FilterPath {
    property(CREATION_TIME_PATH)
}

/// Root a comparison at the object last-update time
pub fn last_updated_at() -> FilterPath {
    property(LAST_UPDATE_TIME_PATH)
}

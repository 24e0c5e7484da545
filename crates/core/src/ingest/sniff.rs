//! Byte-signature content type detection.

use std::fmt;

use serde::{Serialize, Serializer};

/// Content type derived from a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedType {
    /// A known signature matched.
    Known(&'static str),
    /// No known signature matched. Not an error.
    Unknown,
}

impl SniffedType {
    /// Marker string used for undetected content.
    pub const UNKNOWN: &'static str = "unknown";

    /// The MIME type, if one was detected.
    #[must_use]
    pub fn mime_type(&self) -> Option<&'static str> {
        match *self {
            Self::Known(mime) => Some(mime),
            Self::Unknown => None,
        }
    }

    /// The MIME type or the `"unknown"` marker.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.mime_type().unwrap_or(Self::UNKNOWN)
    }

    /// Whether a signature matched.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for SniffedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SniffedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify `bytes` by magic number.
///
/// Never looks at filenames or declared headers.
#[must_use]
pub fn sniff(bytes: &[u8]) -> SniffedType {
    infer::get(bytes).map_or(SniffedType::Unknown, |kind| {
        SniffedType::Known(kind.mime_type())
    })
}

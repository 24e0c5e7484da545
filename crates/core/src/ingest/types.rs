//! Ingest types and data structures.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::storage::StoredObjectRef;

/// A file part staged on local disk by the form parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Staged file path.
    pub path: PathBuf,
    /// Byte length as staged.
    pub size: u64,
    /// Client-supplied filename. Informational only.
    pub file_name: Option<String>,
    /// Client-declared content type. Never used for detection.
    pub declared_content_type: Option<String>,
}

impl FileHandle {
    /// Create a handle for a staged file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            file_name: None,
            declared_content_type: None,
        }
    }

    /// Attach the client-supplied filename.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Attach the client-declared content type.
    #[must_use]
    pub fn with_declared_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.declared_content_type = Some(content_type.into());
        self
    }
}

/// Result of parsing one multipart submission.
#[derive(Debug, Clone, Default)]
pub struct ParsedForm {
    fields: BTreeMap<String, Vec<String>>,
    files: BTreeMap<String, Vec<FileHandle>>,
}

impl ParsedForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar value to `name`.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// Append a staged file to `name`.
    pub fn push_file(&mut self, name: impl Into<String>, handle: FileHandle) {
        self.files.entry(name.into()).or_default().push(handle);
    }

    /// Scalar values by field name, in submission order.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Staged files by field name, in submission order.
    #[must_use]
    pub fn files(&self) -> &BTreeMap<String, Vec<FileHandle>> {
        &self.files
    }

    /// Total number of staged files across all fields.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// First field name used for both a scalar value and a file, if any.
    #[must_use]
    pub fn conflicting_field(&self) -> Option<&str> {
        self.fields
            .keys()
            .find(|name| self.files.contains_key(*name))
            .map(String::as_str)
    }

    /// Reduce repeated scalar fields to their first value.
    ///
    /// Later values for the same name are dropped.
    #[must_use]
    pub fn first_values(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, values)| values.first().map(|v| (name.clone(), v.clone())))
            .collect()
    }

    /// Split into scalar fields and staged files.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Vec<String>>,
        BTreeMap<String, Vec<FileHandle>>,
    ) {
        (self.fields, self.files)
    }
}

/// Body handed to downstream handlers.
///
/// Serializes as one flat JSON object: scalar fields map to strings, file
/// fields map to arrays of stored object references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnifiedBody {
    /// First value of each scalar field.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    /// Stored objects per file field, in submission order.
    #[serde(flatten)]
    pub files: BTreeMap<String, Vec<StoredObjectRef>>,
}

impl UnifiedBody {
    /// Merge reduced scalar fields with grouped upload results.
    #[must_use]
    pub fn merge(
        fields: BTreeMap<String, String>,
        files: BTreeMap<String, Vec<StoredObjectRef>>,
    ) -> Self {
        Self { fields, files }
    }

    /// Scalar value of `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Stored objects of file field `name`.
    #[must_use]
    pub fn stored(&self, name: &str) -> Option<&[StoredObjectRef]> {
        self.files.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(key: &str, content_type: &str) -> StoredObjectRef {
        StoredObjectRef {
            key: key.to_string(),
            location: format!("memory://{key}"),
            bucket: "memory".to_string(),
            content_type: content_type.to_string(),
            size: 4,
        }
    }

    #[test]
    fn test_first_value_wins() {
        let mut form = ParsedForm::new();
        form.push_field("tag", "first");
        form.push_field("tag", "second");
        form.push_field("caption", "hello");

        let reduced = form.first_values();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced["tag"], "first");
        assert_eq!(reduced["caption"], "hello");
    }

    #[test]
    fn test_conflicting_field_detection() {
        let mut form = ParsedForm::new();
        form.push_field("caption", "hello");
        form.push_file("photo", FileHandle::new("/tmp/a", 1));
        assert_eq!(form.conflicting_field(), None);

        form.push_field("photo", "not a file");
        assert_eq!(form.conflicting_field(), Some("photo"));
    }

    #[test]
    fn test_file_count_spans_fields() {
        let mut form = ParsedForm::new();
        form.push_file("photo", FileHandle::new("/tmp/a", 1));
        form.push_file("attachments", FileHandle::new("/tmp/b", 1));
        form.push_file("attachments", FileHandle::new("/tmp/c", 1));
        assert_eq!(form.file_count(), 3);
        assert_eq!(form.files()["attachments"][1].path, PathBuf::from("/tmp/c"));
    }

    #[test]
    fn test_unified_body_serializes_flat() {
        let mut fields = BTreeMap::new();
        fields.insert("caption".to_string(), "hello".to_string());
        let mut files = BTreeMap::new();
        files.insert(
            "photo".to_string(),
            vec![stored("bucketFolder/1-lg-a.png", "image/png")],
        );

        let body = UnifiedBody::merge(fields, files);
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["caption"], "hello");
        assert_eq!(json["photo"][0]["content_type"], "image/png");
        assert_eq!(json["photo"][0]["key"], "bucketFolder/1-lg-a.png");
        assert_eq!(body.field("caption"), Some("hello"));
        assert_eq!(body.stored("photo").map(<[_]>::len), Some(1));
    }
}

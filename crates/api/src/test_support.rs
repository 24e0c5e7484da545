//! Helpers shared by the api crate's tests.

use std::sync::Mutex;

use axum::{
    body::Body,
    extract::Request,
    response::Response,
};
use bytes::Bytes;
use http_body_util::BodyExt;

use formstow_core::ingest::{IngestPipeline, KeyGenerator, SniffedType, StorageKey};
use formstow_core::storage::{ObjectStore, StorageError, StoredObjectRef};

use crate::{AppState, MultipartFormParser};

pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
pub const NOISE: &[u8] = b"plain old bytes with no signature";

const BOUNDARY: &str = "formstow-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.bytes))
            .unwrap()
    }
}

/// Collect a response body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Record of one upload call.
#[derive(Debug, Clone)]
pub struct Call {
    pub key: String,
    pub content_type: SniffedType,
    pub bytes: Bytes,
}

/// Object store that records upload calls and fails on specific content.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<&'static [u8]>,
}

impl RecordingStore {
    pub fn failing_on(bytes: &'static [u8]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(bytes),
        }
    }

    /// Every upload call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ObjectStore for RecordingStore {
    async fn upload(
        &self,
        bytes: Bytes,
        key: &StorageKey,
        content_type: &SniffedType,
    ) -> Result<StoredObjectRef, StorageError> {
        self.calls.lock().unwrap().push(Call {
            key: key.to_string(),
            content_type: *content_type,
            bytes: bytes.clone(),
        });
        if self.fail_on == Some(&bytes[..]) {
            return Err(StorageError::operation("injected failure"));
        }
        Ok(StoredObjectRef {
            key: key.to_string(),
            location: format!("memory://{key}"),
            bucket: "test".to_string(),
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        })
    }
}

/// State wired to `store`, staging in the OS temp dir.
pub fn test_state<S: ObjectStore>(store: S, body_limit_bytes: usize) -> AppState<S> {
    AppState::new(
        MultipartFormParser::default(),
        IngestPipeline::new(
            std::sync::Arc::new(store),
            KeyGenerator::new("bucketFolder", "lg"),
        ),
        body_limit_bytes,
    )
}

//! Form parser seam.

use std::future::Future;

use super::error::IngestError;
use super::types::ParsedForm;

/// A parsed form together with whatever keeps its staged files alive.
///
/// Dropping `staging` is expected to remove the staged files.
#[derive(Debug)]
pub struct StagedForm<G> {
    /// Parsed fields and staged file handles.
    pub form: ParsedForm,
    /// Staging guard owned for the lifetime of the request.
    pub staging: G,
}

/// Multipart parser used by the ingest stage.
///
/// This trait is implemented by the api crate on top of the HTTP framework's
/// multipart support.
pub trait FormParser: Send + Sync {
    /// Incoming request type.
    type Request: Send;
    /// Guard over the staged files.
    type Staging: Send;

    /// Parse a request, staging file parts on local disk.
    ///
    /// Must fail with [`IngestError::Parse`] on malformed input.
    fn parse(
        &self,
        request: Self::Request,
    ) -> impl Future<Output = Result<StagedForm<Self::Staging>, IngestError>> + Send;
}

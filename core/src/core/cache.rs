use super::{
    error::Result,
    http::{HTTPRequest, HTTPResponse},
};

/// Storage for responses keyed by the identity of their request.
///
/// Implementations must be safe for concurrent reads and writes when a
/// transport is shared between tasks; the transport adds no locking of its own.
pub trait Cache: Send + Sync {
    /// Attempt to pull a cached response.
    ///
    /// Must fail with [`Error::CacheMiss`](super::Error::CacheMiss) when there
    /// is no entry for the request. Any other error is treated as a broken cache.
    fn read(
        &self,
        request: &HTTPRequest,
    ) -> impl std::future::Future<Output = Result<HTTPResponse>> + Send;

    /// Attempt to put a response in cache, keyed by `response.request`.
    ///
    /// The response body may be read exactly once here. Implementations which
    /// want the caller to see the body afterwards have to put a fresh one back.
    fn save(
        &self,
        response: &mut HTTPResponse,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

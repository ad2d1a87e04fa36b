use thiserror::Error;

/// Boxed error produced by cache and transport implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the caching transport and its collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport was configured without a cache.
    #[error("no cache set")]
    MissingCache,

    /// Cache holds no entry for the request.
    ///
    /// This is a control signal, not a failure: it is the only read error
    /// that makes the transport fall back to the network.
    #[error("no cached response")]
    CacheMiss,

    /// Cache storage failed while reading or writing.
    #[error("cache error: {0}")]
    Cache(#[source] BoxError),

    /// Request or response body could not be obtained or read.
    #[error("body error: {0}")]
    Body(#[from] std::io::Error),

    /// Underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Request cannot be expressed to the underlying client.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Wrap a storage failure.
    pub fn cache<E: Into<BoxError>>(err: E) -> Self {
        Self::Cache(err.into())
    }

    /// Wrap a transport failure.
    pub fn transport<E: Into<BoxError>>(err: E) -> Self {
        Self::Transport(err.into())
    }

    /// `true` for the cache-miss signal only.
    pub const fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss)
    }
}

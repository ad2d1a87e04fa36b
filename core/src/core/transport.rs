use bytes::Bytes;
use tracing::{debug, warn};

use super::body::{read_to_bytes, BytesBody};
use super::cache::Cache;
use super::error::{Error, Result};
use super::http::{HTTPRequest, HTTPResponse};
use super::transport_config::{SavePolicy, TransportConfig};

#[cfg(feature = "reqwest")]
use crate::common::reqwest_transport::ReqwestTransport;

/// Abstraction to execute a request and get the actual HTTP response.
pub trait RoundTripper: Send + Sync {
    /// Execute `request`.
    ///
    /// The returned response must carry the request it was produced from in
    /// [`HTTPResponse::request`].
    fn round_trip(
        &self,
        request: HTTPRequest,
    ) -> impl std::future::Future<Output = Result<HTTPResponse>> + Send;
}

/// Round tripper which serves responses from a [`Cache`] and falls back to
/// the wrapped transport on a cache miss.
///
/// Keeps no state between calls. Concurrent calls are as safe as the cache is.
#[derive(Debug)]
pub struct CachingTransport<C, T> {
    transport: T,
    cache: C,
    save_policy: SavePolicy,
}

#[cfg(feature = "reqwest")]
impl<C: Cache> CachingTransport<C, ReqwestTransport> {
    /// Build a caching transport over the default `reqwest` client.
    ///
    /// Fails with [`Error::MissingCache`] if the config holds no cache.
    pub fn new(config: TransportConfig<C>) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::default())
    }
}

impl<C: Cache, T: RoundTripper> CachingTransport<C, T> {
    /// Build a caching transport over `transport`.
    ///
    /// Fails with [`Error::MissingCache`] if the config holds no cache.
    pub fn with_transport(config: TransportConfig<C>, transport: T) -> Result<Self> {
        let Some(cache) = config.cache else {
            return Err(Error::MissingCache);
        };

        Ok(Self {
            transport,
            cache,
            save_policy: config.save_policy,
        })
    }

    pub const fn cache(&self) -> &C {
        &self.cache
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn save_policy(&self) -> &SavePolicy {
        &self.save_policy
    }
}

impl<C: Cache, T: RoundTripper> RoundTripper for CachingTransport<C, T> {
    async fn round_trip(&self, request: HTTPRequest) -> Result<HTTPResponse> {
        match self.cache.read(&request).await {
            Ok(response) => {
                debug!(method = %request.method, url = %request.url, "cache hit");
                return Ok(response);
            }
            Err(Error::CacheMiss) => {
                debug!(method = %request.method, url = %request.url, "cache miss");
            }
            Err(err) => return Err(err),
        }

        // The transport drains the one-shot body; keep a copy to put back
        // into the response.
        let request_body = match &request.body_source {
            Some(source) => read_to_bytes(source()?)?,
            None => Bytes::new(),
        };

        let mut response = self.transport.round_trip(request).await?;
        response.request.body = Some(BytesBody::new(request_body).boxed());

        let status = response.status;
        if !self
            .save_policy
            .should_save(status, &response.request.method)
        {
            debug!(
                method = %response.request.method,
                url = %response.request.url,
                status,
                "response passed through without caching"
            );
            return Ok(response);
        }

        if let Err(err) = self.cache.save(&mut response).await {
            warn!(
                method = %response.request.method,
                url = %response.request.url,
                status,
                error = %err,
                "failed to save response"
            );
            release_bodies(&mut response);
            return Err(err);
        }

        debug!(
            method = %response.request.method,
            url = %response.request.url,
            status,
            "response saved"
        );
        Ok(response)
    }
}

fn release_bodies(response: &mut HTTPResponse) {
    if let Err(err) = response.body.close() {
        debug!(error = %err, "failed to close response body");
    }
    if let Some(body) = response.request.body.as_mut() {
        if let Err(err) = body.close() {
            debug!(error = %err, "failed to close request body");
        }
    }
}

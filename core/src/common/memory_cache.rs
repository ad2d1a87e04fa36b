use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use bytes::Bytes;
use url::Url;

use crate::core::{
    body::{bytes_source, read_to_bytes, BoxBody, BytesBody},
    cache::Cache,
    http::{HTTPRequest, HTTPResponse, Headers, HttpMethod, HttpVersion},
    Error, Result,
};

pub type CacheTimestamp = chrono::DateTime<chrono::Utc>;

/// Request part of a cache record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RequestSnapshot {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Response part of a cache record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ResponseSnapshot {
    pub version: HttpVersion,
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Data to be stored in cache
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CacheData {
    /// Timestamp when call has been recorded
    pub call_timestamp: CacheTimestamp,

    /// HTTP Request data.
    pub http_request: RequestSnapshot,

    /// HTTP Response data
    pub http_response: ResponseSnapshot,
}

/// Process-local cache keyed by request method and URL.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheData>>,
}

/// Key identifying a request in [`MemoryCache`].
pub fn cache_key(request: &HTTPRequest) -> String {
    format!("{} {}", request.method, request.url)
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored record for the request, if any.
    pub fn get(&self, request: &HTTPRequest) -> Option<CacheData> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key(request))
            .cloned()
    }

    /// Store a record directly, e.g. one restored from disk.
    pub fn insert(&self, data: CacheData) {
        let key = format!("{} {}", data.http_request.method, data.http_request.url);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, data);
    }

    /// Evict the record for the request.
    pub fn remove(&self, request: &HTTPRequest) -> Option<CacheData> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cache_key(request))
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Cache for MemoryCache {
    async fn read(&self, request: &HTTPRequest) -> Result<HTTPResponse> {
        let Some(data) = self.get(request) else {
            return Err(Error::CacheMiss);
        };
        Ok(data.into_response())
    }

    async fn save(&self, response: &mut HTTPResponse) -> Result<()> {
        let body = drain_and_restore(&mut response.body)?;

        let request = &mut response.request;
        let request_body = match (&request.body_source, request.body.as_mut()) {
            (Some(source), _) => read_to_bytes(source()?)?,
            (None, Some(body)) => drain_and_restore(body)?,
            (None, None) => Bytes::new(),
        };

        self.insert(CacheData {
            call_timestamp: chrono::Utc::now(),
            http_request: RequestSnapshot {
                method: request.method.clone(),
                url: request.url.clone(),
                headers: request.headers.clone(),
                body: request_body.to_vec(),
            },
            http_response: ResponseSnapshot {
                version: response.version,
                status: response.status,
                reason: response.reason.clone(),
                headers: response.headers.clone(),
                body: body.to_vec(),
            },
        });
        Ok(())
    }
}

impl CacheData {
    /// Rebuild a response with fresh, readable bodies.
    pub fn into_response(self) -> HTTPResponse {
        let request_body = Bytes::from(self.http_request.body);
        let request = HTTPRequest {
            method: self.http_request.method,
            url: self.http_request.url,
            headers: self.http_request.headers,
            body: Some(BytesBody::new(request_body.clone()).boxed()),
            body_source: Some(bytes_source(request_body)),
        };

        HTTPResponse {
            version: self.http_response.version,
            status: self.http_response.status,
            reason: self.http_response.reason,
            headers: self.http_response.headers,
            body: BytesBody::new(self.http_response.body).boxed(),
            request,
        }
    }
}

// Read a body slot to the end and leave an identical fresh body in its place.
fn drain_and_restore(slot: &mut BoxBody) -> std::io::Result<Bytes> {
    let body = std::mem::replace(slot, BytesBody::empty().boxed());
    let data = read_to_bytes(body)?;
    *slot = BytesBody::new(data.clone()).boxed();
    Ok(data)
}

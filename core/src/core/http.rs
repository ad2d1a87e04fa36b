use std::{collections::HashMap, fmt, str::FromStr};

use bytes::Bytes;
use url::Url;

use super::body::{bytes_source, BodySource, BoxBody, BytesBody};

/// Http request headers, keyed by header name
pub type Headers = HashMap<String, Vec<String>>;

/// Outgoing HTTP request
pub struct HTTPRequest {
    /// HTTP request method
    pub method: HttpMethod,
    /// HTTP request URL
    pub url: Url,
    /// HTTP request headers
    pub headers: Headers,
    /// One-shot body stream, consumed by the transport
    pub body: Option<BoxBody>,
    /// Replays the request body on demand. `None` means the request is bodyless
    pub body_source: Option<BodySource>,
}

/// HTTP response together with the request which produced it
pub struct HTTPResponse {
    /// HTTP response version
    pub version: HttpVersion,
    /// HTTP response status code
    pub status: u16,
    /// HTTP response status reason
    pub reason: String,
    /// HTTP response headers
    pub headers: Headers,
    /// HTTP response body
    pub body: BoxBody,
    /// Request which produced this response
    pub request: HTTPRequest,
}

/// Collection of common HTTP response status categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HttpResponseStatus {
    /// Informational Responses
    Status1xx,
    /// Successful Responses
    Status2xx,
    /// Redirection Responses
    Status3xx,
    /// Client Error responses
    Status4xx,
    /// Server Error responses
    Status5xx,
    /// Unknown HTTP responses
    StatusUnknown,
}

/// Represents an HTTP method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HttpMethod {
    /// OPTIONS Http Method
    Options,
    /// GET Http Method
    Get,
    /// POST Http Method
    Post,
    /// PUT Http Method
    Put,
    /// DELETE Http Method
    Delete,
    /// HEAD Http Method
    Head,
    /// TRACE Http Method
    Trace,
    /// CONNECT Http Method
    Connect,
    /// PATCH Http Method
    Patch,
    /// Other custom Http Method (name provided)
    Custom(String),
}

/// Represents an HTTP version
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[non_exhaustive]
pub enum HttpVersion {
    /// HTTP Version 0.9
    #[cfg_attr(feature = "serde", serde(rename = "HTTP/0.9"))]
    Http09,
    /// HTTP Version 1.0
    #[cfg_attr(feature = "serde", serde(rename = "HTTP/1.0"))]
    Http10,
    /// HTTP Version 1.1
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "HTTP/1.1"))]
    Http11,
    /// HTTP Version 2.0
    #[cfg_attr(feature = "serde", serde(rename = "HTTP/2.0"))]
    H2,
    /// HTTP Version 3.0
    #[cfg_attr(feature = "serde", serde(rename = "HTTP/3.0"))]
    H3,
}

impl HttpMethod {
    /// Method token as sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
            Self::Patch => "PATCH",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "OPTIONS" => Self::Options,
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "TRACE" => Self::Trace,
            "CONNECT" => Self::Connect,
            "PATCH" => Self::Patch,
            other => Self::Custom(other.to_owned()),
        })
    }
}

impl From<&str> for HttpMethod {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HttpMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HttpMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http09 => "HTTP/0.9",
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
            Self::H2 => "HTTP/2.0",
            Self::H3 => "HTTP/3.0",
        })
    }
}

impl HTTPRequest {
    /// Bodyless request
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            body_source: None,
        }
    }

    /// Append a header value
    #[must_use]
    pub fn with_header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Set an in-memory body together with a source replaying it
    #[must_use]
    pub fn with_body_bytes<B: Into<Bytes>>(mut self, data: B) -> Self {
        let data = data.into();
        self.body = Some(BytesBody::new(data.clone()).boxed());
        self.body_source = Some(bytes_source(data));
        self
    }

    /// Set a body source; the one-shot body is opened from it
    pub fn with_body_source(mut self, source: BodySource) -> std::io::Result<Self> {
        self.body = Some(source()?);
        self.body_source = Some(source);
        Ok(self)
    }
}

impl fmt::Debug for HTTPRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HTTPRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("replayable", &self.body_source.is_some())
            .finish()
    }
}

impl HTTPResponse {
    /// Response with an empty body, no headers and the canonical HTTP/1.1 version
    pub fn new(status: u16, request: HTTPRequest) -> Self {
        Self {
            version: HttpVersion::default(),
            status,
            reason: String::new(),
            headers: Headers::new(),
            body: BytesBody::empty().boxed(),
            request,
        }
    }

    /// Replace response body
    #[must_use]
    pub fn with_body(mut self, body: BoxBody) -> Self {
        self.body = body;
        self
    }

    /// Append a header value
    #[must_use]
    pub fn with_header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Easy way to obtain HTTP response status category
    pub const fn status_category(&self) -> HttpResponseStatus {
        common_status_category(self.status)
    }
}

impl fmt::Debug for HTTPResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HTTPResponse")
            .field("version", &self.version)
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// Status category for a numeric status code
pub const fn common_status_category(status: u16) -> HttpResponseStatus {
    match status {
        100..=199 => HttpResponseStatus::Status1xx,
        200..=299 => HttpResponseStatus::Status2xx,
        300..=399 => HttpResponseStatus::Status3xx,
        400..=499 => HttpResponseStatus::Status4xx,
        500..=599 => HttpResponseStatus::Status5xx,
        _ => HttpResponseStatus::StatusUnknown,
    }
}

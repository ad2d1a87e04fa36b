//! Caching decorator for HTTP request executors.
//!
//! [`CachingTransport`] wraps any [`RoundTripper`] and consults a [`Cache`]
//! before every request. On a miss the request goes to the wrapped
//! transport and the fresh response may be written back to the cache,
//! depending on the [`SavePolicy`].
//!
//! ```no_run
//! use http_caching_transport::common::memory_cache::MemoryCache;
//! use http_caching_transport::core::http::{HTTPRequest, HttpMethod};
//! use http_caching_transport::{CachingTransport, RoundTripper, TransportConfig};
//!
//! # async fn run() -> http_caching_transport::core::Result<()> {
//! let config = TransportConfig::new(MemoryCache::new())
//!     .allowed_status_codes([200])
//!     .allowed_methods([HttpMethod::Get]);
//! let transport = CachingTransport::new(config)?;
//!
//! let url = url::Url::parse("https://example.com/").expect("valid url");
//! let response = transport
//!     .round_trip(HTTPRequest::new(HttpMethod::Post, url).with_body_bytes("payload"))
//!     .await?;
//! assert_eq!(response.request.method, HttpMethod::Post);
//! # Ok(())
//! # }
//! ```
#![warn(
    clippy::derive_partial_eq_without_eq,
    clippy::match_same_arms,
    clippy::same_name_method,
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_async_fn,
    clippy::missing_panics_doc,
    clippy::use_self,
    clippy::single_char_lifetime_names,
    clippy::impl_trait_in_params
)]

pub mod common;
pub mod core;

pub use crate::core::cache::Cache;
pub use crate::core::transport::{CachingTransport, RoundTripper};
pub use crate::core::transport_config::{SavePolicy, TransportConfig};
pub use crate::core::{Error, Result};

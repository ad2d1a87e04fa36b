use std::collections::HashSet;

use super::http::HttpMethod;

/// Decides whether a fresh response goes to the cache.
///
/// The allowed sets describe responses that pass through *without* being
/// cached. A response is saved as soon as it falls outside either set:
/// its status is not allowed, or its request method is not allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SavePolicy {
    /// Status codes passed through without caching
    pub allowed_status_codes: HashSet<u16>,

    /// Request methods passed through without caching
    pub allowed_methods: HashSet<HttpMethod>,
}

impl SavePolicy {
    /// `true` when the response must be written to the cache.
    pub fn should_save(&self, status: u16, method: &HttpMethod) -> bool {
        let is_allowed_status_code = self.allowed_status_codes.contains(&status);
        let is_allowed_method = self.allowed_methods.contains(method);

        !is_allowed_status_code || !is_allowed_method
    }
}

/// Everything needed to build a [`CachingTransport`](super::transport::CachingTransport).
#[derive(Debug, Clone)]
pub struct TransportConfig<C> {
    /// Response storage. Required.
    pub cache: Option<C>,

    /// Save-eligibility policy for fresh responses
    pub save_policy: SavePolicy,
}

impl<C> TransportConfig<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache: Some(cache),
            save_policy: SavePolicy::default(),
        }
    }

    /// Replace the set of pass-through status codes.
    #[must_use]
    pub fn allowed_status_codes<I: IntoIterator<Item = u16>>(mut self, codes: I) -> Self {
        self.save_policy.allowed_status_codes = codes.into_iter().collect();
        self
    }

    /// Replace the set of pass-through methods.
    #[must_use]
    pub fn allowed_methods<I: IntoIterator<Item = HttpMethod>>(mut self, methods: I) -> Self {
        self.save_policy.allowed_methods = methods.into_iter().collect();
        self
    }

    #[must_use]
    pub fn save_policy(mut self, save_policy: SavePolicy) -> Self {
        self.save_policy = save_policy;
        self
    }
}

impl<C> Default for TransportConfig<C> {
    fn default() -> Self {
        Self {
            cache: None,
            save_policy: SavePolicy::default(),
        }
    }
}

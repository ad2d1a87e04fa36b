pub mod memory_cache;
#[cfg(feature = "reqwest")]
pub mod reqwest_transport;

mod error;

pub mod body;
pub mod cache;
pub mod http;
pub mod transport;
pub mod transport_config;

pub use error::BoxError;
pub use error::Error;
pub use error::Result;

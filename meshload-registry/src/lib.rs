//! meshload Route Registry
//!
//! Maps endpoint names to their immutable definitions. The registry is shared
//! by every request handler and may keep growing while requests are served:
//! definitions arrive over an [`EndpointSender`] and are registered by a
//! consumer task draining the matching [`EndpointReceiver`].

pub mod error;
pub mod feed;
pub mod registry;

// Re-export main types
pub use error::{RegistryError, Result};
pub use feed::{endpoint_feed, EndpointReceiver, EndpointSender};
pub use registry::RouteRegistry;

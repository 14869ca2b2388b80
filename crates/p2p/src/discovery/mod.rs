//! The discv5 discovery service.
//!
//! [`Discv5Driver::start`] spawns the service in its own tokio task and
//! returns a [`DiscoveryHandle`]; the task owns the [`discv5::Discv5`]
//! instance and multiplexes the periodic random-node walk, the resolve queue,
//! and handle requests over one select loop.

mod error;
pub use error::DiscoveryBuilderError;

mod builder;
pub use builder::DiscoveryBuilder;

mod driver;
pub use driver::Discv5Driver;

mod handler;
pub use handler::{DiscoveryHandle, DiscoveryRequest};

//! The network driver: owns the swarm, the dial queue, and the live peer
//! table, and wires the discovery service to both.

mod config;
pub use config::Config;

mod error;
pub use error::{NetworkBuilderError, NetworkError};

mod dialer;
pub(crate) use dialer::DialBatch;

mod builder;
pub use builder::NetworkBuilder;

mod driver;
pub use driver::Network;

/// Capacity of the resolve queue; producers drop silently when it is full.
pub(crate) const RESOLVE_QUEUE_CAPACITY: usize = 10;

//! Network errors.

use crate::{discovery::DiscoveryBuilderError, gossip::BehaviourError};
use libp2p::Multiaddr;

/// An error constructing the [`Network`](super::Network).
#[derive(Debug, thiserror::Error)]
pub enum NetworkBuilderError {
    /// The bind address carries no ip component to listen on.
    #[error("malformed bind address: {0}")]
    MalformedBindAddress(Multiaddr),
    /// The discovery key could not be derived from the overlay key.
    #[error("failed to derive the discovery key from the overlay key")]
    KeyDerivation,
    /// Behaviour construction (including topic subscription) failed.
    #[error(transparent)]
    Behaviour(#[from] BehaviourError),
    /// The TCP transport could not be configured.
    #[error("failed to configure the tcp transport")]
    Transport,
    /// The behaviour could not be installed on the swarm.
    #[error("failed to install the network behaviour")]
    SwarmBehaviour,
    /// The discovery service could not be built.
    #[error(transparent)]
    Discovery(#[from] DiscoveryBuilderError),
}

/// An error starting the [`Network`](super::Network).
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The overlay transport could not bind its listen address.
    #[error("failed to bind the overlay transport: {0}")]
    Listen(#[from] libp2p::TransportError<std::io::Error>),
}

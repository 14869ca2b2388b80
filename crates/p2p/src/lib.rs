//! Networking engine for the beacon-chain overlay inspector.
//!
//! Joins the overlay twice over: directly, by dialing bootstrap peers on the
//! libp2p transport, and indirectly, by walking the discv5 discovery overlay
//! for more of them. Every message received on a subscribed gossip topic is
//! surfaced as a structured log event, optionally decoded against the
//! overlay's canonical serialization.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod bootstrap;
pub use bootstrap::{BootstrapAddress, BootstrapParseError, BootstrapSet, unpack_yaml_item};

mod peers;
pub use peers::{
    ATTNETS_ENR_KEY, ETH2_ENR_KEY, EnrFieldPair, Eth2Enr, NodeIdConversionError, PeerInfo,
    PeerInfoError, PeerTable, enr_to_peer_id, peer_id_to_node_id,
};

mod discovery;
pub use discovery::{
    DiscoveryBuilder, DiscoveryBuilderError, DiscoveryHandle, DiscoveryRequest, Discv5Driver,
};

mod gossip;
pub use gossip::{
    Behaviour, BehaviourError, Event, GOSSIP_HEARTBEAT, MessageHandler, SEEN_MESSAGES_TTL,
    SnappyError, compute_message_id, decompress_snappy, gossip_config,
};

mod net;
pub use net::{Config, Network, NetworkBuilder, NetworkBuilderError, NetworkError};

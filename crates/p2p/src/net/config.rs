//! Configuration for the inspector's networking stack.

use crate::peers::{EnrFieldPair, PeerInfo};
use discv5::Enr;
use libp2p::Multiaddr;
use tokio::time::Duration;

/// Configuration for the [`Network`](super::Network).
///
/// The `run` entry point owns one of these; nothing here is global.
#[derive(Debug, Clone)]
pub struct Config {
    /// The multiaddress to bind on, ip layer only.
    pub bind_address: Multiaddr,
    /// TCP port for the overlay transport.
    pub eth_port: u16,
    /// UDP port for discovery.
    pub discovery_port: u16,
    /// Concrete topic names to subscribe to.
    pub topics: Vec<String>,
    /// Decode received payloads against the canonical serialization.
    pub decode: bool,
    /// Sign and verify pub/sub envelopes.
    pub sign: bool,
    /// Render full peer identities in logs.
    pub full_peer_ids: bool,
    /// Target overlay population for discovery.
    pub max_peers: usize,
    /// Disable the discovery loop entirely.
    pub no_discovery: bool,
    /// Shared deadline for each dial batch.
    pub dial_timeout: Duration,
    /// Interval between discovery ticks.
    pub discovery_interval: Duration,
    /// Overlay peers to dial at startup.
    pub eth2_bootnodes: Vec<PeerInfo>,
    /// Signed records seeding the discovery table.
    pub disc_bootnodes: Vec<Enr>,
    /// Discovery endpoints known only by address.
    pub disc_endpoints: Vec<Multiaddr>,
    /// Application fields republished on the local record.
    pub enr_pair: Option<EnrFieldPair>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "/ip4/0.0.0.0".parse().expect("static multiaddress must parse"),
            eth_port: 9000,
            discovery_port: 9000,
            topics: Vec::new(),
            decode: false,
            sign: false,
            full_peer_ids: false,
            max_peers: 100,
            no_discovery: false,
            dial_timeout: Duration::from_secs(10),
            discovery_interval: Duration::from_secs(1),
            eth2_bootnodes: Vec::new(),
            disc_bootnodes: Vec::new(),
            disc_endpoints: Vec::new(),
            enr_pair: None,
        }
    }
}

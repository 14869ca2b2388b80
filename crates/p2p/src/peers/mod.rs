//! Peer identity, record, and table plumbing.
//!
//! Two identifiers exist for the same entity: the overlay knows a peer by its
//! libp2p [`PeerId`](libp2p::PeerId), while the discovery layer addresses the
//! same node by the keccak-256 [`NodeId`](discv5::enr::NodeId) of its raw
//! secp256k1 public key. The conversions live in [`utils`]; they are partial,
//! defined only for secp256k1-keyed identities.

mod enr;
pub use enr::{ATTNETS_ENR_KEY, ETH2_ENR_KEY, EnrFieldPair, Eth2Enr};

mod info;
pub use info::{PeerInfo, PeerInfoError};

mod table;
pub use table::PeerTable;

mod utils;
pub use utils::{NodeIdConversionError, enr_to_peer_id, peer_id_to_node_id};

//! Beacon-chain application fields and transport coordinates of a discovery
//! record.

use alloy_rlp::Decodable;
use discv5::Enr;
use libp2p::{Multiaddr, multiaddr::Protocol};
use periscope_types::{ATTESTATION_BITFIELD_BYTES, EnrForkId, ForkDigest};
use ssz::Decode;

/// The ENR key carrying the SSZ-encoded [`EnrForkId`].
pub const ETH2_ENR_KEY: &str = "eth2";

/// The ENR key carrying the attestation subnet bitfield.
pub const ATTNETS_ENR_KEY: &str = "attnets";

/// The raw `"eth2"`/`"attnets"` value pair of a record, kept RLP-encoded so it
/// can be re-published verbatim on the local record.
///
/// Equality is by `eth2` only: two nodes on the same fork are interchangeable
/// as field donors even when their subnet memberships differ.
#[derive(Debug, Clone, Eq)]
pub struct EnrFieldPair {
    /// RLP-encoded `"eth2"` value.
    pub eth2: Vec<u8>,
    /// RLP-encoded `"attnets"` value.
    pub attnets: Vec<u8>,
}

impl PartialEq for EnrFieldPair {
    fn eq(&self, other: &Self) -> bool {
        self.eth2 == other.eth2
    }
}

/// Read access to the beacon-chain view of an [`Enr`].
pub trait Eth2Enr {
    /// The decoded `"eth2"` fork identifier, if present and well-formed.
    fn fork_id(&self) -> Option<EnrForkId>;

    /// The fork digest of the record.
    fn fork_digest(&self) -> Option<ForkDigest>;

    /// The raw attestation subnet bitfield, bounded by
    /// [`ATTESTATION_BITFIELD_BYTES`].
    fn attnets(&self) -> Option<Vec<u8>>;

    /// Both application fields in insert-ready form.
    fn enr_field_pair(&self) -> Option<EnrFieldPair>;

    /// Every `(ip4|ip6) × tcp` coordinate as a composite multiaddress.
    fn tcp_multiaddrs(&self) -> Vec<Multiaddr>;

    /// Every `(ip4|ip6) × udp` coordinate as a composite multiaddress.
    fn udp_multiaddrs(&self) -> Vec<Multiaddr>;
}

fn decode_field(mut raw: &[u8]) -> Option<Vec<u8>> {
    alloy_primitives::Bytes::decode(&mut raw).ok().map(|bytes| bytes.to_vec())
}

impl Eth2Enr for Enr {
    fn fork_id(&self) -> Option<EnrForkId> {
        let value = decode_field(self.get_raw_rlp(ETH2_ENR_KEY)?)?;
        EnrForkId::from_ssz_bytes(&value).ok()
    }

    fn fork_digest(&self) -> Option<ForkDigest> {
        self.fork_id().map(|fork_id| fork_id.fork_digest)
    }

    fn attnets(&self) -> Option<Vec<u8>> {
        let value = decode_field(self.get_raw_rlp(ATTNETS_ENR_KEY)?)?;
        (value.len() <= ATTESTATION_BITFIELD_BYTES).then_some(value)
    }

    fn enr_field_pair(&self) -> Option<EnrFieldPair> {
        let eth2 = self.get_raw_rlp(ETH2_ENR_KEY)?.to_vec();
        let attnets = self.get_raw_rlp(ATTNETS_ENR_KEY)?.to_vec();
        Some(EnrFieldPair { eth2, attnets })
    }

    fn tcp_multiaddrs(&self) -> Vec<Multiaddr> {
        let mut addrs = Vec::new();
        if let (Some(ip), Some(port)) = (self.ip4(), self.tcp4()) {
            let mut addr = Multiaddr::from(ip);
            addr.push(Protocol::Tcp(port));
            addrs.push(addr);
        }
        if let (Some(ip), Some(port)) = (self.ip6(), self.tcp6()) {
            let mut addr = Multiaddr::from(ip);
            addr.push(Protocol::Tcp(port));
            addrs.push(addr);
        }
        addrs
    }

    fn udp_multiaddrs(&self) -> Vec<Multiaddr> {
        let mut addrs = Vec::new();
        if let (Some(ip), Some(port)) = (self.ip4(), self.udp4()) {
            let mut addr = Multiaddr::from(ip);
            addr.push(Protocol::Udp(port));
            addrs.push(addr);
        }
        if let (Some(ip), Some(port)) = (self.ip6(), self.udp6()) {
            let mut addr = Multiaddr::from(ip);
            addr.push(Protocol::Udp(port));
            addrs.push(addr);
        }
        addrs
    }
}

//! Dialable peer descriptors.

use super::{Eth2Enr, NodeIdConversionError, enr_to_peer_id};
use discv5::Enr;
use libp2p::{Multiaddr, PeerId, multiaddr::Protocol};

/// A peer descriptor: overlay identity plus its known transport addresses.
///
/// Built for the direct-dial path the list holds at least one TCP address;
/// built from a discovery record it holds every `(ip, transport)` coordinate
/// the record advertises, TCP first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    /// The overlay identity.
    pub peer_id: PeerId,
    /// Known transport addresses, in dialing order.
    pub addresses: Vec<Multiaddr>,
}

/// An error building a [`PeerInfo`].
#[derive(Debug, thiserror::Error)]
pub enum PeerInfoError {
    /// The composite address carries no trailing `/p2p/<id>` component.
    #[error("multiaddress has no /p2p identity suffix: {0}")]
    MissingIdentity(Multiaddr),
    /// The record's public key cannot be turned into an overlay identity.
    #[error(transparent)]
    Identity(#[from] NodeIdConversionError),
    /// The record advertises no transport coordinate at all.
    #[error("record advertises no transport address")]
    NoAddresses,
}

impl PeerInfo {
    /// Splits a composite `.../p2p/<id>` address into identity and transport.
    pub fn from_multiaddr(addr: &Multiaddr) -> Result<Self, PeerInfoError> {
        let mut transport = addr.clone();
        match transport.pop() {
            Some(Protocol::P2p(peer_id)) if !transport.is_empty() => {
                Ok(Self { peer_id, addresses: vec![transport] })
            }
            _ => Err(PeerInfoError::MissingIdentity(addr.clone())),
        }
    }

    /// Builds a descriptor from a discovery record.
    pub fn from_enr(enr: &Enr) -> Result<Self, PeerInfoError> {
        let peer_id = enr_to_peer_id(enr)?;
        let mut addresses = enr.tcp_multiaddrs();
        addresses.extend(enr.udp_multiaddrs());
        if addresses.is_empty() {
            return Err(PeerInfoError::NoAddresses);
        }
        Ok(Self { peer_id, addresses })
    }

    /// Whether any address advertises TCP, i.e. the peer is overlay-dialable.
    pub fn has_tcp(&self) -> bool {
        self.addresses.iter().any(|addr| addr.iter().any(|p| matches!(p, Protocol::Tcp(_))))
    }

    /// Whether any address advertises UDP, i.e. the peer is discoverable.
    pub fn has_udp(&self) -> bool {
        self.addresses.iter().any(|addr| addr.iter().any(|p| matches!(p, Protocol::Udp(_))))
    }

    /// The TCP addresses, the only ones the overlay transport can dial.
    pub fn tcp_addresses(&self) -> Vec<Multiaddr> {
        self.addresses
            .iter()
            .filter(|addr| addr.iter().any(|p| matches!(p, Protocol::Tcp(_))))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discv5::enr::CombinedKey;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    #[test]
    fn test_from_multiaddr_splits_identity() {
        let peer_id = PeerId::random();
        let addr = Multiaddr::from_str(&format!("/ip4/10.0.0.1/tcp/9000/p2p/{peer_id}")).unwrap();
        let info = PeerInfo::from_multiaddr(&addr).unwrap();
        assert_eq!(info.peer_id, peer_id);
        assert_eq!(info.addresses, vec![Multiaddr::from_str("/ip4/10.0.0.1/tcp/9000").unwrap()]);
        assert!(info.has_tcp());
        assert!(!info.has_udp());
    }

    #[test]
    fn test_from_multiaddr_requires_identity_suffix() {
        let addr = Multiaddr::from_str("/ip4/10.0.0.1/tcp/9000").unwrap();
        assert!(matches!(
            PeerInfo::from_multiaddr(&addr),
            Err(PeerInfoError::MissingIdentity(_))
        ));

        // A bare identity with no transport prefix is equally useless.
        let addr = Multiaddr::from_str(&format!("/p2p/{}", PeerId::random())).unwrap();
        assert!(PeerInfo::from_multiaddr(&addr).is_err());
    }

    #[test]
    fn test_from_enr_collects_every_coordinate() {
        let key = CombinedKey::generate_secp256k1();
        let mut builder = Enr::builder();
        builder.ip4(Ipv4Addr::new(1, 2, 3, 4)).tcp4(9000).udp4(9001);
        let enr = builder.build(&key).unwrap();

        let info = PeerInfo::from_enr(&enr).unwrap();
        assert_eq!(info.addresses.len(), 2);
        assert!(info.has_tcp());
        assert!(info.has_udp());
        assert_eq!(info.tcp_addresses().len(), 1);
    }

    #[test]
    fn test_from_enr_without_coordinates_fails() {
        let key = CombinedKey::generate_secp256k1();
        let enr = Enr::builder().build(&key).unwrap();
        assert!(matches!(PeerInfo::from_enr(&enr), Err(PeerInfoError::NoAddresses)));
    }

    #[test]
    fn test_udp_only_record_is_not_overlay_dialable() {
        let key = CombinedKey::generate_secp256k1();
        let mut builder = Enr::builder();
        builder.ip4(Ipv4Addr::new(1, 2, 3, 4)).udp4(9001);
        let enr = builder.build(&key).unwrap();

        let info = PeerInfo::from_enr(&enr).unwrap();
        assert!(!info.has_tcp());
        assert!(info.has_udp());
        assert!(info.tcp_addresses().is_empty());
    }
}

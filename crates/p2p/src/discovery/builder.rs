//! Builder for the discovery service.

use super::{DiscoveryBuilderError, Discv5Driver};
use crate::peers::{ATTNETS_ENR_KEY, ETH2_ENR_KEY, EnrFieldPair};
use discv5::{ConfigBuilder, Discv5, Enr, ListenConfig, enr::CombinedKey};
use libp2p::Multiaddr;
use std::net::IpAddr;
use tokio::time::Duration;

/// Assembles the local record and the [`discv5::Discv5`] instance behind a
/// [`Discv5Driver`].
#[derive(Default)]
pub struct DiscoveryBuilder {
    key: Option<CombinedKey>,
    listen: Option<(IpAddr, u16)>,
    enr_pair: Option<EnrFieldPair>,
    bootnodes: Vec<Enr>,
    endpoints: Vec<Multiaddr>,
    target_peers: usize,
    interval: Option<Duration>,
}

impl std::fmt::Debug for DiscoveryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryBuilder")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("listen", &self.listen)
            .field("enr_pair", &self.enr_pair)
            .field("bootnodes", &self.bootnodes)
            .field("endpoints", &self.endpoints)
            .field("target_peers", &self.target_peers)
            .field("interval", &self.interval)
            .finish()
    }
}

impl DiscoveryBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the secp256k1 identity key.
    pub fn with_key(mut self, key: CombinedKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the UDP listen coordinate, also advertised on the local record.
    pub fn with_listen_address(mut self, ip: IpAddr, port: u16) -> Self {
        self.listen = Some((ip, port));
        self
    }

    /// Sets the application fields republished on the local record.
    pub fn with_enr_pair(mut self, pair: Option<EnrFieldPair>) -> Self {
        self.enr_pair = pair;
        self
    }

    /// Seeds the discovery table with signed records.
    pub fn with_bootnodes(mut self, bootnodes: Vec<Enr>) -> Self {
        self.bootnodes = bootnodes;
        self
    }

    /// Seeds the discovery table with endpoints known only by address.
    pub fn with_endpoints(mut self, endpoints: Vec<Multiaddr>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the target overlay population the walk aims for.
    pub fn with_target_peers(mut self, target: usize) -> Self {
        self.target_peers = target;
        self
    }

    /// Sets the interval between random-node queries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Builds the [`Discv5Driver`].
    pub fn build(self) -> Result<Discv5Driver, DiscoveryBuilderError> {
        let key = self.key.ok_or(DiscoveryBuilderError::KeyNotSet)?;
        let (ip, port) = self.listen.ok_or(DiscoveryBuilderError::ListenAddressNotSet)?;

        let mut enr_builder = Enr::builder();
        match ip {
            IpAddr::V4(ip) => enr_builder.ip4(ip).udp4(port),
            IpAddr::V6(ip) => enr_builder.ip6(ip).udp6(port),
        };
        if let Some(pair) = &self.enr_pair {
            enr_builder.add_value_rlp(ETH2_ENR_KEY, pair.eth2.clone().into());
            enr_builder.add_value_rlp(ATTNETS_ENR_KEY, pair.attnets.clone().into());
        }
        let enr =
            enr_builder.build(&key).map_err(|_| DiscoveryBuilderError::EnrBuildFailed)?;

        let config = ConfigBuilder::new(ListenConfig::from_ip(ip, port)).build();
        let disc = Discv5::new(enr, key, config)
            .map_err(|_| DiscoveryBuilderError::Discv5CreationFailed)?;

        Ok(Discv5Driver::new(
            disc,
            self.bootnodes,
            self.endpoints,
            self.interval.unwrap_or(Duration::from_secs(1)),
            self.target_peers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::Eth2Enr;
    use std::net::Ipv4Addr;

    #[test]
    fn test_build_requires_key_and_address() {
        let err = DiscoveryBuilder::new()
            .with_listen_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9000)
            .build()
            .unwrap_err();
        assert_eq!(err, DiscoveryBuilderError::KeyNotSet);

        let err = DiscoveryBuilder::new()
            .with_key(CombinedKey::generate_secp256k1())
            .build()
            .unwrap_err();
        assert_eq!(err, DiscoveryBuilderError::ListenAddressNotSet);
    }

    #[test]
    fn test_local_record_republishes_fields() {
        let pair = EnrFieldPair {
            eth2: alloy_rlp::encode(alloy_primitives::Bytes::from(vec![0xaa; 16])),
            attnets: alloy_rlp::encode(alloy_primitives::Bytes::from(vec![0x01])),
        };
        let driver = DiscoveryBuilder::new()
            .with_key(CombinedKey::generate_secp256k1())
            .with_listen_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9044)
            .with_enr_pair(Some(pair.clone()))
            .with_target_peers(10)
            .build()
            .unwrap();

        let enr = driver.disc.local_enr();
        assert_eq!(enr.udp4(), Some(9044));
        assert_eq!(enr.enr_field_pair(), Some(pair));
    }
}

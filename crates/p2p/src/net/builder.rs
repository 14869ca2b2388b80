//! Network builder.

use super::{Config, Network, NetworkBuilderError, RESOLVE_QUEUE_CAPACITY};
use crate::{
    discovery::Discv5Driver,
    gossip::{Behaviour, MessageHandler, gossip_config},
    peers::PeerTable,
};
use discv5::enr::CombinedKey;
use libp2p::{
    Multiaddr, SwarmBuilder,
    gossipsub::MessageAuthenticity,
    identity::Keypair,
    multiaddr::Protocol,
    noise::Config as NoiseConfig,
    tcp::Config as TcpConfig,
    yamux::Config as YamuxConfig,
};
use std::net::IpAddr;
use tokio::{sync::mpsc, time::Duration};

/// Builds a [`Network`] from a [`Config`].
///
/// One secp256k1 secret is generated here and identifies the node on both
/// layers: the overlay keypair and the discovery record key are derived from
/// the same bytes. The secret lives only inside the two services; it is never
/// persisted or logged.
#[derive(Debug)]
pub struct NetworkBuilder {
    config: Config,
}

impl NetworkBuilder {
    /// Creates a builder over a config.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Extracts the ip layer of the bind address.
    fn bind_ip(addr: &Multiaddr) -> Result<IpAddr, NetworkBuilderError> {
        addr.iter()
            .find_map(|p| match p {
                Protocol::Ip4(ip) => Some(IpAddr::V4(ip)),
                Protocol::Ip6(ip) => Some(IpAddr::V6(ip)),
                _ => None,
            })
            .ok_or_else(|| NetworkBuilderError::MalformedBindAddress(addr.clone()))
    }

    /// Builds the [`Network`].
    pub fn build(self) -> Result<Network, NetworkBuilderError> {
        let config = self.config;
        let bind_ip = Self::bind_ip(&config.bind_address)?;

        // One secret, both identities.
        let secp_keypair = libp2p::identity::secp256k1::Keypair::generate();
        let mut secret_bytes = secp_keypair.secret().to_bytes();
        let disc_key = CombinedKey::secp256k1_from_bytes(&mut secret_bytes)
            .map_err(|_| NetworkBuilderError::KeyDerivation)?;
        let keypair: Keypair = secp_keypair.into();

        let authenticity = if config.sign {
            MessageAuthenticity::Signed(keypair.clone())
        } else {
            MessageAuthenticity::Anonymous
        };
        let behaviour =
            Behaviour::new(authenticity, gossip_config(config.sign), &config.topics)?;

        info!(
            target: "p2p::net",
            peer_id = %keypair.public().to_peer_id(),
            topics = config.topics.len(),
            "overlay identity generated"
        );

        let swarm = SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(TcpConfig::default(), |i: &Keypair| NoiseConfig::new(i), YamuxConfig::default)
            .map_err(|_| NetworkBuilderError::Transport)?
            .with_behaviour(|_| behaviour)
            .map_err(|_| NetworkBuilderError::SwarmBehaviour)?
            .with_swarm_config(|c| c.with_idle_connection_timeout(Duration::from_secs(60)))
            .build();

        let mut listen_addr = config.bind_address.clone();
        listen_addr.push(Protocol::Tcp(config.eth_port));

        let discovery = if config.no_discovery
            || (config.disc_bootnodes.is_empty() && config.disc_endpoints.is_empty())
        {
            None
        } else {
            Some(
                Discv5Driver::builder()
                    .with_key(disc_key)
                    .with_listen_address(bind_ip, config.discovery_port)
                    .with_enr_pair(config.enr_pair.clone())
                    .with_bootnodes(config.disc_bootnodes.clone())
                    .with_endpoints(config.disc_endpoints.clone())
                    .with_target_peers(config.max_peers)
                    .with_interval(config.discovery_interval)
                    .build()?,
            )
        };

        let (dial_tx, dial_rx) = mpsc::unbounded_channel();
        let (resolve_tx, resolve_rx) = mpsc::channel(RESOLVE_QUEUE_CAPACITY);
        let handler = MessageHandler::new(config.decode, config.full_peer_ids);

        Ok(Network::new(
            swarm,
            listen_addr,
            handler,
            PeerTable::new(),
            discovery,
            dial_tx,
            dial_rx,
            resolve_tx,
            resolve_rx,
            config.dial_timeout,
            config.eth2_bootnodes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use periscope_types::{TopicFilter, expand_topics};

    #[test]
    fn test_build_rejects_address_without_ip() {
        let config = Config {
            bind_address: "/dns4/example.com".parse().unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            NetworkBuilder::new(config).build(),
            Err(NetworkBuilderError::MalformedBindAddress(_))
        ));
    }

    #[test]
    fn test_build_with_full_topic_set() {
        let config = Config {
            topics: expand_topics(&TopicFilter::ALL, [0xde, 0xad, 0xbe, 0xef].into()),
            no_discovery: true,
            ..Default::default()
        };
        let network = NetworkBuilder::new(config).build().unwrap();
        assert!(network.discovery.is_none());
    }

    #[test]
    fn test_build_with_signing_enabled() {
        let config = Config { sign: true, no_discovery: true, ..Default::default() };
        assert!(NetworkBuilder::new(config).build().is_ok());
    }
}

//! Network behaviour.

use super::Event;
use derive_more::Debug;
use libp2p::{
    gossipsub::{IdentTopic, MessageAuthenticity},
    swarm::NetworkBehaviour,
};

/// An error creating the [`Behaviour`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BehaviourError {
    /// The gossipsub behaviour rejected its configuration.
    #[error("gossipsub behaviour creation failed: {0}")]
    GossipsubCreationFailed(String),
    /// A topic subscription failed.
    #[error("subscription failed for topic {0}")]
    SubscriptionFailed(String),
}

/// The composed behaviour of the inspector: gossipsub for messages, ping to
/// keep connections warm.
#[derive(NetworkBehaviour, Debug)]
#[behaviour(to_swarm = "Event")]
pub struct Behaviour {
    /// Responds to inbound pings, sends outbound pings.
    #[debug(skip)]
    pub ping: libp2p::ping::Behaviour,
    /// The message routing layer.
    #[debug(skip)]
    pub gossipsub: libp2p::gossipsub::Behaviour,
}

impl Behaviour {
    /// Creates the behaviour and subscribes every topic up front.
    ///
    /// A failed subscription is an error; the caller treats it as fatal since
    /// a partially subscribed inspector silently misses traffic.
    pub fn new(
        authenticity: MessageAuthenticity,
        config: libp2p::gossipsub::Config,
        topics: &[String],
    ) -> Result<Self, BehaviourError> {
        let ping = libp2p::ping::Behaviour::default();

        let mut gossipsub = libp2p::gossipsub::Behaviour::new(authenticity, config)
            .map_err(|err| BehaviourError::GossipsubCreationFailed(err.to_string()))?;

        for name in topics {
            let topic = IdentTopic::new(name.clone());
            gossipsub
                .subscribe(&topic)
                .map_err(|_| BehaviourError::SubscriptionFailed(name.clone()))?;
            info!(target: "p2p::gossip", topic = name, "subscribed to topic");
        }

        Ok(Self { ping, gossipsub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gossip::gossip_config;
    use libp2p::gossipsub::TopicHash;
    use periscope_types::{TopicFilter, expand_topics};

    #[test]
    fn test_behaviour_subscribes_all_topics() {
        let digest = [0xde, 0xad, 0xbe, 0xef].into();
        let mut topics = expand_topics(&TopicFilter::ALL, digest);
        topics.push("custom/topic".to_string());

        let behaviour =
            Behaviour::new(MessageAuthenticity::Anonymous, gossip_config(false), &topics)
                .unwrap();

        let subscribed: Vec<TopicHash> = behaviour.gossipsub.topics().cloned().collect();
        assert_eq!(subscribed.len(), topics.len());
        for name in &topics {
            assert!(subscribed.contains(&TopicHash::from_raw(name.clone())));
        }
    }

    #[test]
    fn test_behaviour_no_topics() {
        let behaviour =
            Behaviour::new(MessageAuthenticity::Anonymous, gossip_config(false), &[]).unwrap();
        assert_eq!(behaviour.gossipsub.topics().count(), 0);
    }
}

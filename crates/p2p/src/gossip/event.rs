//! Swarm event plumbing.

use libp2p::{gossipsub, ping};

/// The behaviour-level event surfaced to the network driver.
#[derive(Debug)]
pub enum Event {
    /// A [`ping::Event`].
    Ping(ping::Event),
    /// A [`gossipsub::Event`].
    Gossipsub(Box<gossipsub::Event>),
}

impl From<ping::Event> for Event {
    fn from(value: ping::Event) -> Self {
        Self::Ping(value)
    }
}

impl From<gossipsub::Event> for Event {
    fn from(value: gossipsub::Event) -> Self {
        Self::Gossipsub(Box::new(value))
    }
}

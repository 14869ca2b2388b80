//! The live peer table.

use super::PeerInfo;
use libp2p::PeerId;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Peers currently considered part of the overlay session.
///
/// Written by the dialer (on successful connects) and the resolver (record
/// enrichment); read by the discovery loop to size its queries. Entries are
/// never evicted here; the transport owns connection liveness.
#[derive(Debug, Clone, Default)]
pub struct PeerTable(Arc<Mutex<HashMap<PeerId, PeerInfo>>>);

impl PeerTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, HashMap<PeerId, PeerInfo>> {
        self.0.lock().expect("peer table lock poisoned")
    }

    /// Records a freshly connected peer, keeping any existing entry.
    pub fn insert(&self, info: PeerInfo) {
        self.guard().entry(info.peer_id).or_insert(info);
    }

    /// Replaces the entry for a peer with a richer descriptor.
    pub fn enrich(&self, info: PeerInfo) {
        self.guard().insert(info.peer_id, info);
    }

    /// Whether the peer is already tracked.
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.guard().contains_key(peer_id)
    }

    /// A snapshot of the descriptor for a peer.
    pub fn get(&self, peer_id: &PeerId) -> Option<PeerInfo> {
        self.guard().get(peer_id).cloned()
    }

    /// The number of tracked peers.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// How many peers are still wanted to reach `target`.
    pub fn deficit(&self, target: usize) -> usize {
        target.saturating_sub(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libp2p::Multiaddr;
    use std::str::FromStr;

    fn info(peer_id: PeerId, addr: &str) -> PeerInfo {
        PeerInfo { peer_id, addresses: vec![Multiaddr::from_str(addr).unwrap()] }
    }

    #[test]
    fn test_insert_keeps_existing_entry() {
        let table = PeerTable::new();
        let peer_id = PeerId::random();
        table.insert(info(peer_id, "/ip4/1.1.1.1/tcp/9000"));
        table.insert(info(peer_id, "/ip4/2.2.2.2/tcp/9000"));
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(&peer_id).unwrap().addresses[0].to_string(),
            "/ip4/1.1.1.1/tcp/9000"
        );
    }

    #[test]
    fn test_enrich_overwrites_entry() {
        let table = PeerTable::new();
        let peer_id = PeerId::random();
        table.insert(info(peer_id, "/ip4/1.1.1.1/tcp/9000"));
        table.enrich(info(peer_id, "/ip4/2.2.2.2/tcp/9000"));
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(&peer_id).unwrap().addresses[0].to_string(),
            "/ip4/2.2.2.2/tcp/9000"
        );
    }

    #[test]
    fn test_deficit_saturates() {
        let table = PeerTable::new();
        table.insert(info(PeerId::random(), "/ip4/1.1.1.1/tcp/9000"));
        table.insert(info(PeerId::random(), "/ip4/1.1.1.2/tcp/9000"));
        assert_eq!(table.deficit(5), 3);
        assert_eq!(table.deficit(1), 0);
    }
}

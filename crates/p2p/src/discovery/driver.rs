//! Discovery driver task.

use super::{DiscoveryBuilder, DiscoveryHandle, DiscoveryRequest};
use crate::peers::{PeerInfo, PeerTable, peer_id_to_node_id};
use discv5::{Discv5, Enr, enr::NodeId};
use libp2p::{Multiaddr, PeerId};
use tokio::{
    sync::mpsc::{Receiver, UnboundedSender, channel},
    time::{Duration, sleep},
};

/// Drives the discv5 service.
///
/// [`Discv5Driver::start`] spawns the service in a new tokio task and returns
/// a [`DiscoveryHandle`]. The task couples three loops over one select:
///
/// - the periodic random-node walk, sized by the live peer table's deficit
///   against the target population, feeding dialable candidates to the dial
///   queue;
/// - the resolver, draining overlay identities observed on gossip and
///   enriching the peer table with their signed records;
/// - handle requests for local introspection.
///
/// Message passing is used instead of sharing the [`Discv5`] behind a lock:
/// the asynchronous query operations would otherwise hold the lock across
/// their futures.
pub struct Discv5Driver {
    /// The discv5 service.
    pub disc: Discv5,
    bootnodes: Vec<Enr>,
    endpoints: Vec<Multiaddr>,
    interval: Duration,
    target_peers: usize,
}

impl std::fmt::Debug for Discv5Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discv5Driver")
            .field("bootnodes", &self.bootnodes.len())
            .field("endpoints", &self.endpoints.len())
            .field("interval", &self.interval)
            .field("target_peers", &self.target_peers)
            .finish_non_exhaustive()
    }
}

impl Discv5Driver {
    /// Returns a fresh [`DiscoveryBuilder`].
    pub fn builder() -> DiscoveryBuilder {
        DiscoveryBuilder::new()
    }

    pub(super) fn new(
        disc: Discv5,
        bootnodes: Vec<Enr>,
        endpoints: Vec<Multiaddr>,
        interval: Duration,
        target_peers: usize,
    ) -> Self {
        Self { disc, bootnodes, endpoints, interval, target_peers }
    }

    /// Binds the underlying service, retrying until it comes up.
    async fn init(&mut self) {
        loop {
            if let Err(err) = self.disc.start().await {
                warn!(target: "p2p::discv5", ?err, "failed to start discovery service, retrying");
                sleep(Duration::from_secs(2)).await;
                continue;
            }
            break;
        }
    }

    /// Seeds the routing table with the bootstrap records and endpoints.
    async fn bootstrap(&self) {
        info!(
            target: "p2p::discv5",
            records = self.bootnodes.len(),
            endpoints = self.endpoints.len(),
            "seeding discovery table"
        );
        for enr in &self.bootnodes {
            if let Err(err) = self.disc.add_enr(enr.clone()) {
                warn!(target: "p2p::discv5", ?err, "failed to add bootstrap record");
            }
        }
        for endpoint in &self.endpoints {
            if let Err(err) = self.disc.request_enr(endpoint.to_string()).await {
                debug!(target: "p2p::discv5", %endpoint, %err, "failed to fetch endpoint record");
            }
        }
    }

    /// Spawns the service task and returns the handle to it.
    ///
    /// `candidates` receives dialable peers for the dial queue; `resolve_rx`
    /// is the capacity-bounded queue of overlay identities to look up.
    pub fn start(
        mut self,
        peers: PeerTable,
        candidates: UnboundedSender<PeerInfo>,
        mut resolve_rx: Receiver<PeerId>,
    ) -> DiscoveryHandle {
        let (req_tx, mut req_rx) = channel::<DiscoveryRequest>(16);

        tokio::spawn(async move {
            self.init().await;
            info!(target: "p2p::discv5", node_id = %self.disc.local_enr().node_id(), "discovery service started");
            self.bootstrap().await;

            let mut interval = tokio::time::interval(self.interval);
            let mut resolve_open = true;
            loop {
                tokio::select! {
                    _ = interval.tick() => self.discover(&peers, &candidates).await,
                    id = resolve_rx.recv(), if resolve_open => match id {
                        Some(peer_id) => self.resolve(peer_id, &peers).await,
                        None => resolve_open = false,
                    },
                    req = req_rx.recv() => match req {
                        Some(DiscoveryRequest::LocalEnr(out)) => {
                            let _ = out.send(self.disc.local_enr());
                        }
                        Some(DiscoveryRequest::PeerCount(out)) => {
                            let _ = out.send(self.disc.connected_peers());
                        }
                        // All handles dropped; queries keep running.
                        None => {}
                    },
                }
            }
        });

        DiscoveryHandle::new(req_tx)
    }

    /// One tick of the random-node walk.
    async fn discover(&self, peers: &PeerTable, candidates: &UnboundedSender<PeerInfo>) {
        let deficit = peers.deficit(self.target_peers);
        if deficit == 0 {
            return;
        }
        match self.disc.find_node(NodeId::random()).await {
            Ok(nodes) => {
                let mut sent = 0usize;
                for enr in nodes {
                    if sent == deficit {
                        break;
                    }
                    let info = match PeerInfo::from_enr(&enr) {
                        Ok(info) => info,
                        Err(err) => {
                            debug!(target: "p2p::discv5", %err, "discarding discovery record");
                            continue;
                        }
                    };
                    if !info.has_tcp() {
                        debug!(target: "p2p::discv5", peer = %info.peer_id, "discovery only peer");
                        continue;
                    }
                    if peers.contains(&info.peer_id) {
                        trace!(target: "p2p::discv5", peer = %info.peer_id, "peer already known");
                        continue;
                    }
                    if candidates.send(info).is_err() {
                        // Dialer is gone; nothing left to feed.
                        return;
                    }
                    sent += 1;
                }
                if sent > 0 {
                    debug!(target: "p2p::discv5", count = sent, "queued discovery peers for dialing");
                }
            }
            Err(err) => {
                debug!(target: "p2p::discv5", %err, "discovery query failed");
            }
        }
    }

    /// Resolves one overlay identity to its signed record.
    async fn resolve(&self, peer_id: PeerId, peers: &PeerTable) {
        let node_id = match peer_id_to_node_id(&peer_id) {
            Ok(node_id) => node_id,
            Err(err) => {
                trace!(target: "p2p::resolver", peer = %peer_id, %err, "identity not resolvable");
                return;
            }
        };
        match self.disc.find_node(node_id).await {
            Ok(nodes) => {
                let Some(enr) = nodes.into_iter().find(|enr| enr.node_id() == node_id) else {
                    trace!(target: "p2p::resolver", peer = %peer_id, "peer not found");
                    return;
                };
                match PeerInfo::from_enr(&enr) {
                    Ok(info) => {
                        debug!(target: "p2p::resolver", peer = %peer_id, addresses = info.addresses.len(), "peer record resolved");
                        peers.enrich(info);
                    }
                    Err(err) => {
                        warn!(target: "p2p::resolver", peer = %peer_id, %err, "record is invalid");
                    }
                }
            }
            Err(err) => {
                warn!(target: "p2p::resolver", peer = %peer_id, %err, "resolve failed");
            }
        }
    }
}

//! Network driver task.

use super::{DialBatch, NetworkError};
use crate::{
    discovery::{DiscoveryHandle, Discv5Driver},
    gossip::{Behaviour, Event, MessageHandler},
    peers::{PeerInfo, PeerTable},
};
use derive_more::Debug;
use futures::stream::StreamExt;
use libp2p::{
    Multiaddr, PeerId, Swarm,
    gossipsub,
    swarm::{SwarmEvent, dial_opts::DialOpts},
};
use tokio::{
    sync::mpsc::{Receiver, Sender, UnboundedReceiver, UnboundedSender},
    time::{Duration, Instant, sleep_until},
};

/// The long-running networking stack of the inspector.
///
/// [`Network::start`] binds the overlay transport, seeds the dial queue with
/// the bootstrap peers, hands the discovery service its channels, and spawns
/// the driver task. The task owns the swarm and multiplexes:
///
/// - the dial queue: one blocking pop, then a non-blocking drain into a batch
///   of parallel dials racing a shared deadline;
/// - swarm events: connection results settle the pending batch, gossip
///   messages feed the decode pipeline and the resolve hook;
/// - the batch deadline timer.
#[derive(Debug)]
pub struct Network {
    #[debug(skip)]
    pub(crate) swarm: Swarm<Behaviour>,
    pub(crate) listen_addr: Multiaddr,
    pub(crate) handler: MessageHandler,
    pub(crate) peers: PeerTable,
    pub(crate) discovery: Option<Discv5Driver>,
    #[debug(skip)]
    pub(crate) dial_tx: UnboundedSender<PeerInfo>,
    #[debug(skip)]
    pub(crate) dial_rx: UnboundedReceiver<PeerInfo>,
    #[debug(skip)]
    pub(crate) resolve_tx: Sender<PeerId>,
    #[debug(skip)]
    pub(crate) resolve_rx: Option<Receiver<PeerId>>,
    pub(crate) dial_timeout: Duration,
    pub(crate) bootnodes: Vec<PeerInfo>,
}

impl Network {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        swarm: Swarm<Behaviour>,
        listen_addr: Multiaddr,
        handler: MessageHandler,
        peers: PeerTable,
        discovery: Option<Discv5Driver>,
        dial_tx: UnboundedSender<PeerInfo>,
        dial_rx: UnboundedReceiver<PeerInfo>,
        resolve_tx: Sender<PeerId>,
        resolve_rx: Receiver<PeerId>,
        dial_timeout: Duration,
        bootnodes: Vec<PeerInfo>,
    ) -> Self {
        Self {
            swarm,
            listen_addr,
            handler,
            peers,
            discovery,
            dial_tx,
            dial_rx,
            resolve_tx,
            resolve_rx: Some(resolve_rx),
            dial_timeout,
            bootnodes,
        }
    }

    /// A clone of the live peer table.
    pub fn peer_table(&self) -> PeerTable {
        self.peers.clone()
    }

    /// The local overlay identity.
    pub fn local_peer_id(&self) -> &PeerId {
        self.swarm.local_peer_id()
    }

    /// A producer handle for the dial queue.
    pub fn dialer(&self) -> UnboundedSender<PeerInfo> {
        self.dial_tx.clone()
    }

    /// Binds the transport, starts discovery, and spawns the driver task.
    ///
    /// Returns the discovery handle when discovery is enabled. The task never
    /// terminates on its own; no dial or decode failure is fatal.
    pub fn start(mut self) -> Result<Option<DiscoveryHandle>, NetworkError> {
        self.swarm.listen_on(self.listen_addr.clone())?;
        info!(target: "p2p::net", address = %self.listen_addr, "overlay transport listening");

        for info in std::mem::take(&mut self.bootnodes) {
            let _ = self.dial_tx.send(info);
        }

        let resolve_rx = self.resolve_rx.take();
        let handle = match (self.discovery.take(), resolve_rx) {
            (Some(discovery), Some(resolve_rx)) => Some(discovery.start(
                self.peers.clone(),
                self.dial_tx.clone(),
                resolve_rx,
            )),
            _ => {
                info!(target: "p2p::net", "discovery disabled");
                None
            }
        };

        tokio::spawn(async move {
            let mut batch: Option<DialBatch> = None;
            loop {
                let deadline = batch.as_ref().map(|b| b.deadline);
                tokio::select! {
                    info = self.dial_rx.recv(), if batch.is_none() => {
                        // The driver holds its own sender, so the queue never
                        // closes underneath us.
                        let Some(first) = info else { continue };
                        let mut infos = vec![first];
                        while let Ok(more) = self.dial_rx.try_recv() {
                            infos.push(more);
                        }
                        batch = self.start_batch(infos);
                    }
                    event = self.swarm.select_next_some() => {
                        self.handle_swarm_event(event, &mut batch);
                    }
                    _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                        if let Some(expired) = batch.take() {
                            expired.finish();
                        }
                    }
                }
            }
        });

        Ok(handle)
    }

    /// Issues one batch of parallel dials against a shared deadline.
    fn start_batch(&mut self, infos: Vec<PeerInfo>) -> Option<DialBatch> {
        let infos: Vec<PeerInfo> = infos
            .into_iter()
            .filter(|info| {
                if self.swarm.is_connected(&info.peer_id) {
                    trace!(target: "p2p::dialer", peer = %info.peer_id, "peer already connected");
                    return false;
                }
                true
            })
            .collect();
        if infos.is_empty() {
            return None;
        }

        let mut batch = DialBatch::new(infos.len(), Instant::now() + self.dial_timeout);
        for info in infos {
            let opts = DialOpts::peer_id(info.peer_id)
                .addresses(info.tcp_addresses())
                .build();
            match self.swarm.dial(opts) {
                Ok(()) => {
                    trace!(target: "p2p::dialer", peer = %info.peer_id, "dialing peer");
                    batch.track(info);
                }
                Err(err) => {
                    warn!(target: "p2p::dialer", peer = %info.peer_id, %err, "unable to connect");
                    batch.record_immediate_failure();
                }
            }
        }

        if batch.is_done() {
            batch.finish();
            None
        } else {
            Some(batch)
        }
    }

    fn settle_batch(batch: &mut Option<DialBatch>) {
        if batch.as_ref().is_some_and(DialBatch::is_done) {
            if let Some(done) = batch.take() {
                done.finish();
            }
        }
    }

    /// Handles one swarm event.
    fn handle_swarm_event(&mut self, event: SwarmEvent<Event>, batch: &mut Option<DialBatch>) {
        match event {
            SwarmEvent::ConnectionEstablished { peer_id, endpoint, .. } => {
                if let Some(info) =
                    batch.as_mut().and_then(|b| b.record_success(&peer_id))
                {
                    info!(
                        target: "p2p::dialer",
                        peer = %peer_id,
                        address = %endpoint.get_remote_address(),
                        "connected"
                    );
                    self.peers.insert(info);
                } else {
                    trace!(target: "p2p::net", peer = %peer_id, "connection established");
                }
                Self::settle_batch(batch);
            }
            SwarmEvent::OutgoingConnectionError { peer_id: Some(peer_id), error, .. } => {
                if batch.as_mut().is_some_and(|b| b.record_failure(&peer_id)) {
                    warn!(target: "p2p::dialer", peer = %peer_id, %error, "unable to connect");
                } else {
                    trace!(target: "p2p::net", peer = %peer_id, %error, "outgoing connection error");
                }
                Self::settle_batch(batch);
            }
            SwarmEvent::Behaviour(Event::Gossipsub(event)) => self.handle_gossip_event(*event),
            SwarmEvent::Behaviour(Event::Ping(event)) => {
                trace!(target: "p2p::net", peer = %event.peer, result = ?event.result, "ping");
            }
            other => {
                trace!(target: "p2p::net", event = ?other, "swarm event");
            }
        }
    }

    /// Handles one gossipsub event.
    fn handle_gossip_event(&mut self, event: gossipsub::Event) {
        match event {
            gossipsub::Event::Message { propagation_source, message, .. } => {
                self.handler.handle(propagation_source, &message);
                if !self.peers.contains(&propagation_source) {
                    // Best-effort enrichment: a full queue drops the identity.
                    let _ = self.resolve_tx.try_send(propagation_source);
                }
            }
            gossipsub::Event::Subscribed { peer_id, topic } => {
                trace!(target: "p2p::gossip", peer = %peer_id, topic = %topic, "peer subscribed");
            }
            other => {
                trace!(target: "p2p::gossip", event = ?other, "gossipsub event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Config, NetworkBuilder};

    fn network(port: u16) -> Network {
        NetworkBuilder::new(Config {
            eth_port: port,
            no_discovery: true,
            topics: vec!["/eth2/deadbeef/beacon_block/ssz_snappy".to_string()],
            ..Default::default()
        })
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn test_start_binds_and_spawns() {
        let net = network(40911);
        let peers = net.peer_table();
        let handle = net.start().unwrap();
        assert!(handle.is_none());
        assert!(peers.is_empty());
    }

    #[tokio::test]
    async fn test_start_batch_counts_undialable_addresses() {
        let mut net = network(40912);
        // A peer with no reachable address fails immediately or stays
        // pending until the deadline; either way the batch tracks it.
        let info = PeerInfo {
            peer_id: PeerId::random(),
            addresses: vec!["/ip4/127.0.0.1/tcp/1".parse().unwrap()],
        };
        let batch = net.start_batch(vec![info]);
        assert!(batch.is_some());
    }
}

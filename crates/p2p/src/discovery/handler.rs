//! Handle to the spawned discovery task.

use discv5::Enr;
use tokio::sync::{mpsc::Sender, oneshot};

/// A request from a [`DiscoveryHandle`] to the spawned service task.
#[derive(Debug)]
pub enum DiscoveryRequest {
    /// Requests the local signed record.
    LocalEnr(oneshot::Sender<Enr>),
    /// Requests the number of connected discovery peers.
    PeerCount(oneshot::Sender<usize>),
}

/// Message-passing handle to the discovery task.
#[derive(Debug, Clone)]
pub struct DiscoveryHandle {
    sender: Sender<DiscoveryRequest>,
}

impl DiscoveryHandle {
    pub(super) fn new(sender: Sender<DiscoveryRequest>) -> Self {
        Self { sender }
    }

    /// The local signed record, or `None` when the task is gone.
    pub async fn local_enr(&self) -> Option<Enr> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(DiscoveryRequest::LocalEnr(tx)).await.ok()?;
        rx.await.ok()
    }

    /// The number of connected discovery peers, or `None` when the task is
    /// gone.
    pub async fn peer_count(&self) -> Option<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(DiscoveryRequest::PeerCount(tx)).await.ok()?;
        rx.await.ok()
    }
}

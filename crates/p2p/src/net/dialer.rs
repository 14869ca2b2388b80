//! Dial batch bookkeeping.

use crate::peers::PeerInfo;
use libp2p::PeerId;
use std::collections::HashMap;
use tokio::time::Instant;

/// One drained batch of dial attempts racing a shared deadline.
///
/// The batch tracks which attempts are still pending and settles each one as
/// connected, failed, or timed out; `succeed + failed + timed == total` when
/// the batch finishes.
#[derive(Debug)]
pub(crate) struct DialBatch {
    /// The shared deadline for every attempt in the batch.
    pub(crate) deadline: Instant,
    pending: HashMap<PeerId, PeerInfo>,
    succeed: usize,
    failed: usize,
    total: usize,
}

impl DialBatch {
    /// Creates a batch of `total` attempts against `deadline`.
    pub(crate) fn new(total: usize, deadline: Instant) -> Self {
        Self { deadline, pending: HashMap::new(), succeed: 0, failed: 0, total }
    }

    /// Tracks an attempt that was successfully issued.
    pub(crate) fn track(&mut self, info: PeerInfo) {
        self.pending.insert(info.peer_id, info);
    }

    /// Records an attempt that failed before it could even be issued.
    pub(crate) fn record_immediate_failure(&mut self) {
        self.failed += 1;
    }

    /// Settles a pending attempt as connected.
    pub(crate) fn record_success(&mut self, peer_id: &PeerId) -> Option<PeerInfo> {
        let info = self.pending.remove(peer_id)?;
        self.succeed += 1;
        Some(info)
    }

    /// Settles a pending attempt as failed.
    pub(crate) fn record_failure(&mut self, peer_id: &PeerId) -> bool {
        let known = self.pending.remove(peer_id).is_some();
        if known {
            self.failed += 1;
        }
        known
    }

    /// Whether every attempt has settled.
    pub(crate) fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Settles the remaining attempts as timed out and reports the batch.
    pub(crate) fn finish(self) {
        let timed = self.pending.len();
        for peer_id in self.pending.keys() {
            warn!(target: "p2p::dialer", peer = %peer_id, "dial timed out");
        }
        info!(
            target: "p2p::dialer",
            succeed = self.succeed,
            failed = self.failed,
            timed,
            total = self.total,
            "dial batch complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libp2p::Multiaddr;
    use std::str::FromStr;
    use tokio::time::Duration;

    fn info(peer_id: PeerId) -> PeerInfo {
        PeerInfo {
            peer_id,
            addresses: vec![Multiaddr::from_str("/ip4/1.2.3.4/tcp/9000").unwrap()],
        }
    }

    #[tokio::test]
    async fn test_batch_settles_each_attempt_once() {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut batch = DialBatch::new(3, deadline);
        let connected = PeerId::random();
        let failed = PeerId::random();
        let timed = PeerId::random();
        batch.track(info(connected));
        batch.track(info(failed));
        batch.track(info(timed));

        assert!(batch.record_success(&connected).is_some());
        assert!(batch.record_success(&connected).is_none());
        assert!(batch.record_failure(&failed));
        assert!(!batch.record_failure(&failed));
        assert!(!batch.record_failure(&PeerId::random()));

        assert!(!batch.is_done());
        assert_eq!(batch.succeed, 1);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.pending.len(), 1);
        assert_eq!(batch.succeed + batch.failed + batch.pending.len(), batch.total);
        batch.finish();
    }

    #[tokio::test]
    async fn test_batch_with_immediate_failures_completes() {
        let mut batch = DialBatch::new(2, Instant::now());
        batch.record_immediate_failure();
        batch.record_immediate_failure();
        assert!(batch.is_done());
        assert_eq!(batch.failed, batch.total);
    }
}

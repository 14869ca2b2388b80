//! Shared code for integration tests.

use periscope_p2p::{Config, Network, NetworkBuilder};
use tokio::time::Duration;

/// Helper function to create a new network instance bound to loopback.
///
/// Discovery is disabled; the tests drive the dial queue directly.
pub(crate) fn network(port: u16) -> Network {
    NetworkBuilder::new(Config {
        bind_address: "/ip4/127.0.0.1".parse().expect("static multiaddress must parse"),
        eth_port: port,
        no_discovery: true,
        topics: vec!["/eth2/deadbeef/beacon_block/ssz_snappy".to_string()],
        dial_timeout: Duration::from_secs(10),
        ..Default::default()
    })
    .build()
    .expect("creates network")
}

/// Polls `check` every 100 ms until it passes or `secs` seconds elapse.
pub(crate) async fn wait_for(secs: u64, mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..secs * 10 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    check()
}

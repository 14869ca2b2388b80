//! Tests dialing between two live network instances on loopback.

mod common;

use libp2p::PeerId;
use periscope_p2p::PeerInfo;

#[tokio::test]
async fn test_dial_between_networks_populates_peer_table() {
    let listener = common::network(40121);
    let listener_peer = *listener.local_peer_id();
    listener.start().expect("listener starts");

    let dialer = common::network(40122);
    let table = dialer.peer_table();
    let dial_queue = dialer.dialer();
    dialer.start().expect("dialer starts");

    // Let both transports finish binding before the dial goes out.
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    dial_queue
        .send(PeerInfo {
            peer_id: listener_peer,
            addresses: vec!["/ip4/127.0.0.1/tcp/40121".parse().unwrap()],
        })
        .expect("dial queue accepts");

    // A successful dial lands the peer in the live table.
    assert!(common::wait_for(10, || table.contains(&listener_peer)).await);
    assert_eq!(table.len(), 1);
    let info = table.get(&listener_peer).unwrap();
    assert!(info.has_tcp());
}

#[tokio::test]
async fn test_dial_to_dead_port_never_populates_peer_table() {
    let dialer = common::network(40123);
    let table = dialer.peer_table();
    let dial_queue = dialer.dialer();
    dialer.start().expect("dialer starts");

    // Nothing listens on this port; the attempt settles as failed and the
    // loop keeps running.
    let ghost = PeerId::random();
    dial_queue
        .send(PeerInfo {
            peer_id: ghost,
            addresses: vec!["/ip4/127.0.0.1/tcp/40124".parse().unwrap()],
        })
        .expect("dial queue accepts");

    assert!(!common::wait_for(2, || table.contains(&ghost)).await);
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_batch_settles_mixed_outcomes() {
    let listener = common::network(40125);
    let listener_peer = *listener.local_peer_id();
    listener.start().expect("listener starts");

    let dialer = common::network(40126);
    let table = dialer.peer_table();
    let dial_queue = dialer.dialer();
    dialer.start().expect("dialer starts");

    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    // One reachable peer and one dead port drain into the same batch; only
    // the reachable one may ever reach the table.
    let ghost = PeerId::random();
    dial_queue
        .send(PeerInfo {
            peer_id: listener_peer,
            addresses: vec!["/ip4/127.0.0.1/tcp/40125".parse().unwrap()],
        })
        .expect("dial queue accepts");
    dial_queue
        .send(PeerInfo {
            peer_id: ghost,
            addresses: vec!["/ip4/127.0.0.1/tcp/40127".parse().unwrap()],
        })
        .expect("dial queue accepts");

    assert!(common::wait_for(10, || table.contains(&listener_peer)).await);
    assert!(!table.contains(&ghost));
    assert_eq!(table.len(), 1);
}

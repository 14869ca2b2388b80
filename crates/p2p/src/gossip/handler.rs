//! Per-message decode pipeline.

use super::decompress_snappy;
use alloy_primitives::hex;
use libp2p::{PeerId, gossipsub::Message};
use periscope_types::{
    AggregateAndProof, Attestation, AttesterSlashing, GOSSIP_MAX_SIZE, ProposerSlashing,
    SNAPPY_SUFFIX, SignedBeaconBlock, SignedVoluntaryExit, TopicKind,
};
use ssz::Decode;

/// Handles every message delivered on a subscribed topic.
///
/// The raw event is always reported; decoding is opt-in and strictly
/// best-effort. Nothing here can fail the gossip loop: decompression and
/// decode errors are logged and swallowed. No deduplication happens here
/// either; the transport's message-id cache already did that.
#[derive(Debug, Clone)]
pub struct MessageHandler {
    decode: bool,
    full_peer_ids: bool,
}

impl MessageHandler {
    /// Creates a handler.
    pub fn new(decode: bool, full_peer_ids: bool) -> Self {
        Self { decode, full_peer_ids }
    }

    /// Reports one delivered message and, when enabled, decodes it.
    ///
    /// `source` is the peer that forwarded the message, not necessarily its
    /// author; the caller uses it to drive record resolution.
    pub fn handle(&self, source: PeerId, message: &Message) {
        let topic = message.topic.as_str();
        info!(
            target: "p2p::gossip",
            peer = %self.render_peer(&source),
            size = message.data.len(),
            topic,
            data = %hex::encode(&message.data),
            "received pubsub message"
        );

        if !self.decode {
            return;
        }

        let payload;
        let bytes: &[u8] = if topic.ends_with(SNAPPY_SUFFIX) {
            match decompress_snappy(&message.data, GOSSIP_MAX_SIZE) {
                Ok(data) => {
                    payload = data;
                    &payload
                }
                Err(err) => {
                    warn!(target: "p2p::decoder", topic, %err, "unable to decompress message");
                    return;
                }
            }
        } else {
            &message.data
        };

        if let Some(kind) = TopicKind::classify(topic) {
            self.decode_payload(kind, topic, bytes);
        }
    }

    fn decode_payload(&self, kind: TopicKind, topic: &str, bytes: &[u8]) {
        let outcome = match kind {
            TopicKind::BeaconBlock => {
                SignedBeaconBlock::from_ssz_bytes(bytes).map(|block| {
                    info!(
                        target: "p2p::decoder",
                        topic,
                        slot = block.message.slot,
                        proposer = block.message.proposer_index,
                        parent_root = %block.message.parent_root,
                        attestations = block.message.body.attestations.len(),
                        "SignedBeaconBlock"
                    );
                })
            }
            TopicKind::Attestation => Attestation::from_ssz_bytes(bytes).map(|attestation| {
                info!(
                    target: "p2p::decoder",
                    topic,
                    slot = attestation.data.slot,
                    index = attestation.data.index,
                    root = %attestation.data.beacon_block_root,
                    bits = attestation.aggregation_bits.bit_len(),
                    "Attestation"
                );
            }),
            TopicKind::VoluntaryExit => {
                SignedVoluntaryExit::from_ssz_bytes(bytes).map(|exit| {
                    info!(
                        target: "p2p::decoder",
                        topic,
                        epoch = exit.message.epoch,
                        validator = exit.message.validator_index,
                        "SignedVoluntaryExit"
                    );
                })
            }
            TopicKind::ProposerSlashing => {
                ProposerSlashing::from_ssz_bytes(bytes).map(|slashing| {
                    info!(
                        target: "p2p::decoder",
                        topic,
                        slot = slashing.signed_header_1.message.slot,
                        proposer = slashing.signed_header_1.message.proposer_index,
                        "ProposerSlashing"
                    );
                })
            }
            TopicKind::AttesterSlashing => {
                AttesterSlashing::from_ssz_bytes(bytes).map(|slashing| {
                    info!(
                        target: "p2p::decoder",
                        topic,
                        indices_1 = slashing.attestation_1.attesting_indices.len(),
                        indices_2 = slashing.attestation_2.attesting_indices.len(),
                        "AttesterSlashing"
                    );
                })
            }
            TopicKind::AggregateAndProof => {
                AggregateAndProof::from_ssz_bytes(bytes).map(|aggregate| {
                    info!(
                        target: "p2p::decoder",
                        topic,
                        aggregator = aggregate.aggregator_index,
                        slot = aggregate.aggregate.data.slot,
                        "AggregateAndProof"
                    );
                })
            }
        };

        if let Err(err) = outcome {
            info!(target: "p2p::decoder", topic, ?err, "unable to decode message");
        }
    }

    fn render_peer(&self, peer: &PeerId) -> String {
        let repr = peer.to_base58();
        if self.full_peer_ids || repr.len() <= 8 {
            repr
        } else {
            format!("...{}", &repr[repr.len() - 8..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gossip::snappy::compress_snappy;
    use libp2p::gossipsub::TopicHash;
    use periscope_types::{AttestationData, BitList, BlsSignature};
    use ssz::Encode;

    fn message(topic: &str, data: Vec<u8>) -> Message {
        Message {
            source: None,
            data,
            sequence_number: None,
            topic: TopicHash::from_raw(topic),
        }
    }

    fn sample_attestation() -> Attestation {
        Attestation {
            aggregation_bits: BitList::from_raw_bytes(vec![0b0000_1101]).unwrap(),
            data: AttestationData::default(),
            signature: BlsSignature::repeat_byte(0x01),
        }
    }

    #[test]
    fn test_handle_survives_garbage_on_every_family() {
        let handler = MessageHandler::new(true, false);
        let source = PeerId::random();
        for topic in [
            "/eth2/deadbeef/beacon_block/ssz_snappy",
            "/eth2/deadbeef/beacon_attestation_4/ssz_snappy",
            "/eth2/deadbeef/voluntary_exit/ssz_snappy",
            "/eth2/deadbeef/proposer_slashing/ssz_snappy",
            "/eth2/deadbeef/attester_slashing/ssz_snappy",
            "/eth2/deadbeef/beacon_aggregate_and_proof/ssz_snappy",
            "some-custom-topic",
        ] {
            // Corrupt framing and undecodable payloads are both swallowed.
            handler.handle(source, &message(topic, vec![0xde, 0xad]));
            handler.handle(source, &message(topic, compress_snappy(&[0xff; 8])));
        }
    }

    #[test]
    fn test_handle_decodes_valid_attestation() {
        let handler = MessageHandler::new(true, true);
        let encoded = compress_snappy(&sample_attestation().as_ssz_bytes());
        handler.handle(
            PeerId::random(),
            &message("/eth2/deadbeef/beacon_attestation_0/ssz_snappy", encoded),
        );
    }

    #[test]
    fn test_handle_without_decoding_touches_nothing() {
        let handler = MessageHandler::new(false, false);
        // Even corrupt snappy on a decodable family must not log a warning
        // path that panics.
        handler.handle(
            PeerId::random(),
            &message("/eth2/deadbeef/beacon_block/ssz_snappy", vec![0x00]),
        );
    }

    #[test]
    fn test_render_peer_modes() {
        let full = MessageHandler::new(false, true);
        let short = MessageHandler::new(false, false);
        let peer = PeerId::random();
        let repr = peer.to_base58();
        assert_eq!(full.render_peer(&peer), repr);
        let shortened = short.render_peer(&peer);
        assert!(shortened.starts_with("..."));
        assert!(repr.ends_with(shortened.trim_start_matches("...")));
    }
}

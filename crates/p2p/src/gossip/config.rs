//! Gossipsub configuration.

use super::decompress_snappy;
use lazy_static::lazy_static;
use libp2p::gossipsub::{Config, ConfigBuilder, Message, MessageId, ValidationMode};
use periscope_types::GOSSIP_MAX_SIZE;
use sha2::{Digest, Sha256};
use std::time::Duration;

lazy_static! {
    /// The gossip heartbeat.
    pub static ref GOSSIP_HEARTBEAT: Duration = Duration::from_millis(700);

    /// How long message ids are remembered for deduplication. The decoder
    /// relies on this; it performs no deduplication of its own.
    pub static ref SEEN_MESSAGES_TTL: Duration = 130 * *GOSSIP_HEARTBEAT;
}

/// Domain prefix mixed into ids of payloads that decompress cleanly.
const DOMAIN_VALID_SNAPPY: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// Domain prefix mixed into ids of payloads that do not.
const DOMAIN_INVALID_SNAPPY: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// Computes the canonical [`MessageId`] of a gossip [`Message`]:
/// sha256 over a snappy-validity domain plus the (decompressed) payload,
/// truncated to 20 bytes.
pub fn compute_message_id(msg: &Message) -> MessageId {
    let mut hasher = Sha256::new();
    match decompress_snappy(&msg.data, GOSSIP_MAX_SIZE) {
        Ok(data) => {
            hasher.update(DOMAIN_VALID_SNAPPY);
            hasher.update(&data);
        }
        Err(_) => {
            hasher.update(DOMAIN_INVALID_SNAPPY);
            hasher.update(&msg.data);
        }
    }
    MessageId(hasher.finalize()[..20].to_vec())
}

/// Builds the gossipsub configuration.
///
/// Authorship is anonymous unless envelope signing is requested; either way
/// the message id is the canonical snappy-domain hash so the transport's
/// deduplication matches the rest of the overlay.
pub fn gossip_config(sign: bool) -> Config {
    let validation =
        if sign { ValidationMode::Strict } else { ValidationMode::Anonymous };
    let mut builder = ConfigBuilder::default();
    builder
        .heartbeat_interval(*GOSSIP_HEARTBEAT)
        .history_length(12)
        .history_gossip(3)
        .fanout_ttl(Duration::from_secs(60))
        .support_floodsub()
        .max_transmit_size(GOSSIP_MAX_SIZE)
        .duplicate_cache_time(*SEEN_MESSAGES_TTL)
        .validation_mode(validation)
        .message_id_fn(compute_message_id);
    builder.build().expect("static gossipsub config must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gossip::snappy::compress_snappy as compress;
    use libp2p::gossipsub::TopicHash;

    fn message(data: Vec<u8>) -> Message {
        Message {
            source: None,
            data,
            sequence_number: None,
            topic: TopicHash::from_raw("/eth2/deadbeef/beacon_block/ssz_snappy"),
        }
    }

    #[test]
    fn test_message_id_valid_snappy() {
        let payload = vec![1, 2, 3, 4, 5];
        let id = compute_message_id(&message(compress(&payload)));

        let mut hasher = Sha256::new();
        hasher.update([0x01, 0x00, 0x00, 0x00]);
        hasher.update(&payload);
        assert_eq!(id.0, hasher.finalize()[..20].to_vec());
    }

    #[test]
    fn test_message_id_invalid_snappy() {
        let raw = vec![9, 9, 9];
        let id = compute_message_id(&message(raw.clone()));

        let mut hasher = Sha256::new();
        hasher.update([0x00, 0x00, 0x00, 0x00]);
        hasher.update(&raw);
        assert_eq!(id.0, hasher.finalize()[..20].to_vec());
    }

    #[test]
    fn test_config_is_buildable_both_ways() {
        assert_eq!(gossip_config(false).max_transmit_size(), GOSSIP_MAX_SIZE);
        assert_eq!(gossip_config(true).max_transmit_size(), GOSSIP_MAX_SIZE);
    }
}

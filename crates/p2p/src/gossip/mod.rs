//! The gossip layer: topic subscription and the per-message decode pipeline.

mod snappy;
pub use snappy::{SnappyError, decompress_snappy};

mod config;
pub use config::{GOSSIP_HEARTBEAT, SEEN_MESSAGES_TTL, compute_message_id, gossip_config};

mod event;
pub use event::Event;

mod behaviour;
pub use behaviour::{Behaviour, BehaviourError};

mod handler;
pub use handler::MessageHandler;

//! Canonical data model for the beacon-chain gossip overlay.
//!
//! Contains the SSZ containers the inspector decodes off the wire, the
//! `"eth2"` ENR fork identifier, bit-list plumbing, and the pure topic-name
//! construction used to subscribe.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// A slot number.
pub type Slot = u64;

/// An epoch number.
pub type Epoch = u64;

/// A committee index within a slot.
pub type CommitteeIndex = u64;

/// A validator registry index.
pub type ValidatorIndex = u64;

/// A 32-byte hash tree root.
pub type Root = alloy_primitives::B256;

/// A compressed BLS12-381 public key.
pub type BlsPublicKey = alloy_primitives::FixedBytes<48>;

/// A compressed BLS12-381 signature.
pub type BlsSignature = alloy_primitives::FixedBytes<96>;

/// The 4-byte digest binding the overlay's current fork.
pub type ForkDigest = alloy_primitives::FixedBytes<4>;

/// A 4-byte fork version.
pub type ForkVersion = alloy_primitives::FixedBytes<4>;

mod consts;
pub use consts::{ATTESTATION_BITFIELD_BYTES, ATTESTATION_SUBNET_COUNT, GOSSIP_MAX_SIZE};

mod bitfield;
pub use bitfield::BitList;

mod enr_fork;
pub use enr_fork::EnrForkId;

mod attestation;
pub use attestation::{
    AggregateAndProof, Attestation, AttestationData, Checkpoint, IndexedAttestation,
};

mod block;
pub use block::{
    BeaconBlock, BeaconBlockBody, BeaconBlockHeader, Deposit, DepositData, DepositProof,
    Eth1Data, SignedBeaconBlock, SignedBeaconBlockHeader,
};

mod operations;
pub use operations::{
    AttesterSlashing, ProposerSlashing, SignedVoluntaryExit, VoluntaryExit,
};

mod topics;
pub use topics::{
    SNAPPY_SUFFIX, TopicFilter, TopicKind, aggregate_and_proofs_topic, attestation_topic,
    attester_slashings_topic, beacon_blocks_topic, expand_topics, parse_topic_codes,
    proposer_slashings_topic, voluntary_exits_topic,
};

//! Canonical gossip topic names.
//!
//! Every topic name is a pure function of the fork digest (and, for
//! attestations, the subnet id); the `_snappy` suffix marks snappy-framed
//! payloads.

use crate::{ForkDigest, consts::ATTESTATION_SUBNET_COUNT};

/// Suffix marking a snappy-framed topic payload.
pub const SNAPPY_SUFFIX: &str = "_snappy";

/// The topic families the inspector can be asked to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicFilter {
    /// Beacon block proposals.
    Blocks,
    /// Per-subnet attestation aggregates.
    Attestations,
    /// Voluntary validator exits.
    VoluntaryExits,
    /// Proposer slashing evidence.
    ProposerSlashings,
    /// Attester slashing evidence.
    AttesterSlashings,
}

impl TopicFilter {
    /// Every topic family, in subscription order.
    pub const ALL: [Self; 5] = [
        Self::Blocks,
        Self::Attestations,
        Self::VoluntaryExits,
        Self::ProposerSlashings,
        Self::AttesterSlashings,
    ];

    /// Maps an operator short code to a filter. Unknown codes map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "b" => Some(Self::Blocks),
            "a" => Some(Self::Attestations),
            "e" => Some(Self::VoluntaryExits),
            "ps" => Some(Self::ProposerSlashings),
            "as" => Some(Self::AttesterSlashings),
            _ => None,
        }
    }
}

/// Resolves the operator-supplied short codes into a filter set.
///
/// An empty list and the wildcard `*` both select every family; codes that
/// match nothing are dropped without complaint.
pub fn parse_topic_codes(codes: &[String]) -> Vec<TopicFilter> {
    if codes.is_empty() || codes.iter().any(|c| c.trim() == "*") {
        return TopicFilter::ALL.to_vec();
    }
    let mut filters = Vec::new();
    for code in codes {
        if let Some(filter) = TopicFilter::from_code(code.trim()) {
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
    }
    filters
}

fn digest_hex(fork_digest: ForkDigest) -> String {
    alloy_primitives::hex::encode(fork_digest)
}

/// The beacon block topic for a fork.
pub fn beacon_blocks_topic(fork_digest: ForkDigest) -> String {
    format!("/eth2/{}/beacon_block/ssz", digest_hex(fork_digest))
}

/// The attestation topic for one subnet of a fork.
pub fn attestation_topic(fork_digest: ForkDigest, subnet_id: u64) -> String {
    format!("/eth2/{}/beacon_attestation_{subnet_id}/ssz", digest_hex(fork_digest))
}

/// The voluntary exit topic for a fork.
pub fn voluntary_exits_topic(fork_digest: ForkDigest) -> String {
    format!("/eth2/{}/voluntary_exit/ssz", digest_hex(fork_digest))
}

/// The proposer slashing topic for a fork.
pub fn proposer_slashings_topic(fork_digest: ForkDigest) -> String {
    format!("/eth2/{}/proposer_slashing/ssz", digest_hex(fork_digest))
}

/// The attester slashing topic for a fork.
pub fn attester_slashings_topic(fork_digest: ForkDigest) -> String {
    format!("/eth2/{}/attester_slashing/ssz", digest_hex(fork_digest))
}

/// The aggregate-and-proof topic for a fork.
///
/// No [`TopicFilter`] expands to this family; it is reachable only through a
/// custom topic, but the decoder recognizes it.
pub fn aggregate_and_proofs_topic(fork_digest: ForkDigest) -> String {
    format!("/eth2/{}/beacon_aggregate_and_proof/ssz", digest_hex(fork_digest))
}

/// Expands a filter set into the concrete snappy-suffixed topic names.
pub fn expand_topics(filters: &[TopicFilter], fork_digest: ForkDigest) -> Vec<String> {
    let mut names = Vec::new();
    for filter in filters {
        match filter {
            TopicFilter::Blocks => names.push(beacon_blocks_topic(fork_digest)),
            TopicFilter::Attestations => {
                for subnet_id in 0..ATTESTATION_SUBNET_COUNT {
                    names.push(attestation_topic(fork_digest, subnet_id));
                }
            }
            TopicFilter::VoluntaryExits => names.push(voluntary_exits_topic(fork_digest)),
            TopicFilter::ProposerSlashings => names.push(proposer_slashings_topic(fork_digest)),
            TopicFilter::AttesterSlashings => names.push(attester_slashings_topic(fork_digest)),
        }
    }
    for name in &mut names {
        name.push_str(SNAPPY_SUFFIX);
    }
    names
}

/// The message family a received topic name decodes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// `SignedBeaconBlock` payloads.
    BeaconBlock,
    /// `Attestation` payloads (any subnet).
    Attestation,
    /// `SignedVoluntaryExit` payloads.
    VoluntaryExit,
    /// `ProposerSlashing` payloads.
    ProposerSlashing,
    /// `AttesterSlashing` payloads.
    AttesterSlashing,
    /// `AggregateAndProof` payloads.
    AggregateAndProof,
}

impl TopicKind {
    /// Classifies a snappy-suffixed topic name by its family segment.
    ///
    /// Non-snappy and unrecognized names classify as `None`.
    pub fn classify(topic: &str) -> Option<Self> {
        if !topic.ends_with(SNAPPY_SUFFIX) {
            return None;
        }
        if topic.contains("/beacon_block/") {
            Some(Self::BeaconBlock)
        } else if topic.contains("/beacon_attestation_") {
            Some(Self::Attestation)
        } else if topic.contains("/voluntary_exit/") {
            Some(Self::VoluntaryExit)
        } else if topic.contains("/proposer_slashing/") {
            Some(Self::ProposerSlashing)
        } else if topic.contains("/attester_slashing/") {
            Some(Self::AttesterSlashing)
        } else if topic.contains("/beacon_aggregate_and_proof/") {
            Some(Self::AggregateAndProof)
        } else {
            None
        }
    }
}

//! Overlay protocol constants.

/// Number of attestation subnets partitioning the attestation topic namespace.
pub const ATTESTATION_SUBNET_COUNT: u64 = 64;

/// Upper bound on the decompressed size of a gossip payload.
pub const GOSSIP_MAX_SIZE: usize = 1 << 20;

/// Maximum serialized length of the `"attnets"` subnet bitfield: one bit per
/// subnet plus the bit-list sentinel.
pub const ATTESTATION_BITFIELD_BYTES: usize = ATTESTATION_SUBNET_COUNT as usize / 8 + 1;

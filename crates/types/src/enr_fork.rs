//! The fork identifier carried under the `"eth2"` ENR key.

use crate::{Epoch, ForkDigest, ForkVersion};
use ssz_derive::{Decode, Encode};

/// The value of the `"eth2"` key in a discovery record.
///
/// Binds a node to a fork: the current digest plus the next scheduled fork.
/// Serialized as a fixed 16-byte SSZ container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct EnrForkId {
    /// Digest of the fork the node is currently on.
    pub fork_digest: ForkDigest,
    /// Version of the next scheduled fork.
    pub next_fork_version: ForkVersion,
    /// Epoch at which the next fork activates.
    pub next_fork_epoch: Epoch,
}

impl EnrForkId {
    /// Serialized length of the container.
    pub const SSZ_LEN: usize = 16;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::fixed_bytes;
    use ssz::{Decode, Encode};

    #[test]
    fn test_fixed_length_encoding() {
        let fork_id = EnrForkId {
            fork_digest: fixed_bytes!("deadbeef"),
            next_fork_version: fixed_bytes!("01000000"),
            next_fork_epoch: u64::MAX,
        };
        let bytes = fork_id.as_ssz_bytes();
        assert_eq!(bytes.len(), EnrForkId::SSZ_LEN);
        assert_eq!(EnrForkId::from_ssz_bytes(&bytes).unwrap(), fork_id);
    }

    #[test]
    fn test_rejects_truncated_bytes() {
        assert!(EnrForkId::from_ssz_bytes(&[0u8; 15]).is_err());
    }
}

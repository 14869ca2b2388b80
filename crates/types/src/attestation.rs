//! Attestation containers.

use crate::{BitList, BlsSignature, CommitteeIndex, Epoch, Root, Slot, ValidatorIndex};
use ssz_derive::{Decode, Encode};

/// An epoch boundary reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct Checkpoint {
    /// The epoch of the boundary.
    pub epoch: Epoch,
    /// The block root at the boundary.
    pub root: Root,
}

/// The vote an attestation commits to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct AttestationData {
    /// Slot the attestation is for.
    pub slot: Slot,
    /// Committee index within the slot.
    pub index: CommitteeIndex,
    /// LMD GHOST head vote.
    pub beacon_block_root: Root,
    /// FFG source checkpoint.
    pub source: Checkpoint,
    /// FFG target checkpoint.
    pub target: Checkpoint,
}

/// An aggregated attestation as gossiped on the subnet topics.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Attestation {
    /// Which committee members signed.
    pub aggregation_bits: BitList,
    /// The vote.
    pub data: AttestationData,
    /// Aggregate BLS signature over the vote.
    pub signature: BlsSignature,
}

/// An attestation with its signers listed by validator index.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct IndexedAttestation {
    /// Signing validator indices, sorted ascending.
    pub attesting_indices: Vec<ValidatorIndex>,
    /// The vote.
    pub data: AttestationData,
    /// Aggregate BLS signature over the vote.
    pub signature: BlsSignature,
}

/// An aggregate attestation paired with the aggregator's selection proof.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AggregateAndProof {
    /// Index of the aggregating validator.
    pub aggregator_index: ValidatorIndex,
    /// The aggregate attestation.
    pub aggregate: Attestation,
    /// Proof the validator was selected to aggregate.
    pub selection_proof: BlsSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz::{Decode, Encode};

    fn sample_data() -> AttestationData {
        AttestationData {
            slot: 42,
            index: 3,
            beacon_block_root: Root::repeat_byte(0xaa),
            source: Checkpoint { epoch: 4, root: Root::repeat_byte(0xbb) },
            target: Checkpoint { epoch: 5, root: Root::repeat_byte(0xcc) },
        }
    }

    #[test]
    fn test_attestation_roundtrip() {
        let attestation = Attestation {
            aggregation_bits: BitList::from_raw_bytes(vec![0b0101_1001]).unwrap(),
            data: sample_data(),
            signature: BlsSignature::repeat_byte(0x11),
        };
        let bytes = attestation.as_ssz_bytes();
        assert_eq!(Attestation::from_ssz_bytes(&bytes).unwrap(), attestation);
    }

    #[test]
    fn test_aggregate_and_proof_decodes_nested_bitlist() {
        let aggregate = AggregateAndProof {
            aggregator_index: 7,
            aggregate: Attestation {
                aggregation_bits: BitList::from_raw_bytes(vec![0xff, 0x03]).unwrap(),
                data: sample_data(),
                signature: BlsSignature::repeat_byte(0x22),
            },
            selection_proof: BlsSignature::repeat_byte(0x33),
        };
        let decoded = AggregateAndProof::from_ssz_bytes(&aggregate.as_ssz_bytes()).unwrap();
        assert_eq!(decoded.aggregate.aggregation_bits.bit_len(), 9);
        assert_eq!(decoded, aggregate);
    }

    #[test]
    fn test_attestation_rejects_empty_bitfield() {
        let attestation = Attestation {
            aggregation_bits: BitList::from_raw_bytes(vec![0x01]).unwrap(),
            data: sample_data(),
            signature: BlsSignature::ZERO,
        };
        let mut bytes = attestation.as_ssz_bytes();
        // Drop the bitfield byte entirely; the sentinel check must fire.
        bytes.truncate(bytes.len() - 1);
        assert!(Attestation::from_ssz_bytes(&bytes).is_err());
    }
}

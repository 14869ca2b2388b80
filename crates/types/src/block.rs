//! Beacon block containers.

use crate::{
    Attestation, AttesterSlashing, BlsPublicKey, BlsSignature, ProposerSlashing, Root,
    SignedVoluntaryExit, Slot, ValidatorIndex,
};
use ssz::DecodeError;
use ssz_derive::{Decode, Encode};

/// Depth of the deposit contract Merkle tree, plus the length mix-in.
const DEPOSIT_PROOF_LEN: usize = 33;

/// The fixed-size Merkle branch proving a deposit against the eth1 root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositProof(pub [Root; DEPOSIT_PROOF_LEN]);

impl ssz::Encode for DepositProof {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        DEPOSIT_PROOF_LEN * 32
    }

    fn ssz_bytes_len(&self) -> usize {
        DEPOSIT_PROOF_LEN * 32
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        for node in &self.0 {
            buf.extend_from_slice(node.as_slice());
        }
    }
}

impl ssz::Decode for DepositProof {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        DEPOSIT_PROOF_LEN * 32
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != DEPOSIT_PROOF_LEN * 32 {
            return Err(DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: DEPOSIT_PROOF_LEN * 32,
            });
        }
        let mut proof = [Root::ZERO; DEPOSIT_PROOF_LEN];
        for (node, chunk) in proof.iter_mut().zip(bytes.chunks_exact(32)) {
            *node = Root::from_slice(chunk);
        }
        Ok(Self(proof))
    }
}

/// A vote for an eth1 chain snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct Eth1Data {
    /// Root of the deposit tree.
    pub deposit_root: Root,
    /// Total deposits included so far.
    pub deposit_count: u64,
    /// Hash of the eth1 block voted for.
    pub block_hash: Root,
}

/// The signed content of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct DepositData {
    /// Validator public key being deposited for.
    pub pubkey: BlsPublicKey,
    /// Withdrawal credential commitment.
    pub withdrawal_credentials: Root,
    /// Deposit amount in Gwei.
    pub amount: u64,
    /// Signature over the deposit message.
    pub signature: BlsSignature,
}

/// A deposit with its inclusion proof against the eth1 deposit root.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Deposit {
    /// Merkle branch from the deposit leaf to the deposit root.
    pub proof: DepositProof,
    /// The deposit content.
    pub data: DepositData,
}

/// The fixed-size summary of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct BeaconBlockHeader {
    /// Slot the block was proposed in.
    pub slot: Slot,
    /// Index of the proposing validator.
    pub proposer_index: ValidatorIndex,
    /// Root of the parent block.
    pub parent_root: Root,
    /// Post-state root.
    pub state_root: Root,
    /// Root of the block body.
    pub body_root: Root,
}

/// A block header with the proposer's signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct SignedBeaconBlockHeader {
    /// The header.
    pub message: BeaconBlockHeader,
    /// Proposer signature over the header root.
    pub signature: BlsSignature,
}

/// The operations carried by a block.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BeaconBlockBody {
    /// RANDAO commitment reveal.
    pub randao_reveal: BlsSignature,
    /// The proposer's eth1 vote.
    pub eth1_data: Eth1Data,
    /// Arbitrary proposer-chosen bytes.
    pub graffiti: Root,
    /// Proposer slashing operations.
    pub proposer_slashings: Vec<ProposerSlashing>,
    /// Attester slashing operations.
    pub attester_slashings: Vec<AttesterSlashing>,
    /// Included attestations.
    pub attestations: Vec<Attestation>,
    /// Included deposits.
    pub deposits: Vec<Deposit>,
    /// Included voluntary exits.
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
}

/// A beacon block as gossiped on the block topic.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BeaconBlock {
    /// Slot the block is proposed for.
    pub slot: Slot,
    /// Index of the proposing validator.
    pub proposer_index: ValidatorIndex,
    /// Root of the parent block.
    pub parent_root: Root,
    /// Post-state root.
    pub state_root: Root,
    /// The block body.
    pub body: BeaconBlockBody,
}

/// A block with the proposer's signature.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SignedBeaconBlock {
    /// The block.
    pub message: BeaconBlock,
    /// Proposer signature over the block root.
    pub signature: BlsSignature,
}

//! Standalone validator operations.

use crate::{BlsSignature, Epoch, IndexedAttestation, SignedBeaconBlockHeader, ValidatorIndex};
use ssz_derive::{Decode, Encode};

/// A request by a validator to exit the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct VoluntaryExit {
    /// Earliest epoch the exit may be processed.
    pub epoch: Epoch,
    /// The exiting validator.
    pub validator_index: ValidatorIndex,
}

/// A voluntary exit with the validator's signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct SignedVoluntaryExit {
    /// The exit request.
    pub message: VoluntaryExit,
    /// Signature of the exiting validator.
    pub signature: BlsSignature,
}

/// Evidence that a proposer signed two conflicting headers for one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct ProposerSlashing {
    /// The first conflicting header.
    pub signed_header_1: SignedBeaconBlockHeader,
    /// The second conflicting header.
    pub signed_header_2: SignedBeaconBlockHeader,
}

/// Evidence of two conflicting attestations by overlapping validator sets.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct AttesterSlashing {
    /// The first conflicting attestation.
    pub attestation_1: IndexedAttestation,
    /// The second conflicting attestation.
    pub attestation_2: IndexedAttestation,
}

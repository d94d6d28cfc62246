use anchor_lang::prelude::*;

#[error_code]
pub enum CodecError {
    #[msg("Cannot build a root over an empty batch")]
    EmptyBatch,
    #[msg("Two messages in the batch hash to the same leaf")]
    DuplicateLeaf,
    #[msg("Leaf is not part of this tree")]
    UnknownLeaf,
    #[msg("Proof path exceeds the maximum depth")]
    MalformedProof,
    #[msg("Unsupported proof type")]
    InvalidProofType,
    #[msg("Fee arithmetic overflow")]
    FeeOverflow,
    #[msg("Protocol fee does not cover the configured protocol fees")]
    NotEnoughProtocolFee,
}

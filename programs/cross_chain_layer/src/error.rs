use anchor_lang::prelude::*;
use ccl_common::CodecError;

/// Exit code reported for a successful operation.
pub const EXIT_CODE_SUCCESS: u32 = 0;

#[error_code]
pub enum CrossChainLayerError {
    // Authorization
    #[msg("Caller is not the admin")]
    NotFromAdmin,
    #[msg("Executor guard has no pending dispatch")]
    NotFromExecutor,
    #[msg("Caller is not the sequencer multisig")]
    NotFromSequencerMultisig,
    #[msg("Caller is not the proposed admin")]
    NotFromNewAdmin,
    #[msg("Executor is not allowed to prove this message")]
    UnauthorizedExecutor,
    #[msg("New admin address is none")]
    NewAdminAddressIsNone,

    // Value and balance
    #[msg("Attached value does not cover the required amount")]
    NotEnoughTon,
    #[msg("Locked balance does not cover the unlocked value")]
    InsufficientBalance,
    #[msg("Attached value does not cover the executor fee")]
    InsufficientExecutorFee,

    // Protocol invariants
    #[msg("Protocol fee supply is zero")]
    ZeroFeeSupply,
    #[msg("Proof does not reconstruct a held root")]
    InvalidProof,
    #[msg("Root is not valid yet")]
    VotingNotActive,
    #[msg("Message collect end time moved backwards")]
    MessageCollectEndTimeLow,
    #[msg("Protocol fee does not cover the configured protocol fees")]
    NotEnoughProtocolFee,
    #[msg("Message was already executed or is being executed")]
    AlreadySpent,
    #[msg("Proof is malformed")]
    MalformedProof,
    #[msg("Unsupported proof type")]
    InvalidProofType,
    #[msg("Epoch did not advance")]
    EpochNotAdvanced,
    #[msg("Message hash does not match the supplied message")]
    InvalidMessageHash,
    #[msg("Destination accounts do not match the message entries")]
    DestinationMismatch,
    #[msg("Destination cannot receive the forwarded value")]
    DestinationRejected,
    #[msg("Executor fee token cannot be minted by the protocol")]
    InvalidExecutorFeeToken,
    #[msg("Message has no entries")]
    EmptyMessage,
    #[msg("Max roots size is out of range")]
    InvalidMaxRootsSize,
    #[msg("Epoch delay is below the network minimum")]
    EpochDelayTooShort,
    #[msg("Unknown operation type")]
    UnknownOperationType,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl CrossChainLayerError {
    /// Stable numeric code carried by error notifications.
    pub fn exit_code(self) -> u32 {
        use CrossChainLayerError::*;

        match self {
            NotFromAdmin => 70,
            NotFromExecutor => 71,
            NotFromSequencerMultisig => 72,
            NotFromNewAdmin => 73,
            UnauthorizedExecutor => 74,
            NewAdminAddressIsNone => 80,
            NotEnoughTon => 100,
            InsufficientBalance => 101,
            InsufficientExecutorFee => 102,
            ZeroFeeSupply => 200,
            InvalidProof => 201,
            VotingNotActive => 202,
            MessageCollectEndTimeLow => 203,
            NotEnoughProtocolFee => 204,
            AlreadySpent => 205,
            MalformedProof => 206,
            InvalidProofType => 207,
            EpochNotAdvanced => 208,
            InvalidMessageHash => 209,
            DestinationMismatch => 210,
            DestinationRejected => 211,
            InvalidExecutorFeeToken => 212,
            EmptyMessage => 213,
            InvalidMaxRootsSize => 214,
            EpochDelayTooShort => 215,
            UnknownOperationType => 216,
            ArithmeticOverflow => 217,
        }
    }
}

impl From<CodecError> for CrossChainLayerError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::MalformedProof => Self::MalformedProof,
            CodecError::InvalidProofType => Self::InvalidProofType,
            CodecError::NotEnoughProtocolFee => Self::NotEnoughProtocolFee,
            CodecError::FeeOverflow => Self::ArithmeticOverflow,
            CodecError::EmptyBatch | CodecError::DuplicateLeaf | CodecError::UnknownLeaf => {
                Self::InvalidProof
            }
        }
    }
}

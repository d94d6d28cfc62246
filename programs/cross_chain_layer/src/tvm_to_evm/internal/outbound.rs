use anchor_lang::prelude::*;
use ccl_common::{compose_fee, total_required, FeeRecord, FeeSplit, FeeTopUp, ProtocolFees};

use crate::error::CrossChainLayerError;

/// Operations the outbound leg accepts, decoded from their 32-bit wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum OperationType {
    TonTransfer,
    JettonTransfer,
    NftTransfer,
    JettonBurn,
    NftBurn,
}

impl OperationType {
    pub fn tag(self) -> u32 {
        match self {
            Self::TonTransfer => 0x4ad6_7cd3,
            Self::JettonTransfer => 0x2906_ab02,
            Self::NftTransfer => 0x8b09_2962,
            Self::JettonBurn => 0xb0af_a74d,
            Self::NftBurn => 0xbcd1_9310,
        }
    }

    /// Lamports retained to cover processing of this operation.
    pub fn gas_reserve(self) -> u64 {
        match self {
            Self::TonTransfer => 5_000,
            Self::JettonTransfer | Self::JettonBurn => 10_000,
            Self::NftTransfer | Self::NftBurn => 15_000,
        }
    }
}

impl TryFrom<u32> for OperationType {
    type Error = CrossChainLayerError;

    fn try_from(tag: u32) -> std::result::Result<Self, Self::Error> {
        [
            Self::TonTransfer,
            Self::JettonTransfer,
            Self::NftTransfer,
            Self::JettonBurn,
            Self::NftBurn,
        ]
        .into_iter()
        .find(|operation| operation.tag() == tag)
        .ok_or(CrossChainLayerError::UnknownOperationType)
    }
}

/// Accepted outbound submission, before any value moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundQuote {
    pub required: u64,
    /// Added to the protocol fee supply.
    pub protocol_fee: u64,
    /// Executor fees and the operation's gas reserve, added to the executor fee supply.
    pub executor_fee: u64,
    /// `None` when the message carries no fee record.
    pub fee_split: Option<FeeSplit>,
    /// Returned to the response address.
    pub excess: u64,
}

/// Prices an outbound submission against `attached_value`.
///
/// A protocol fee below the configured fees is reported as
/// `NotEnoughProtocolFee` even when the attached value also falls short.
pub fn quote_outbound(
    protocol_fees: &ProtocolFees,
    operation: OperationType,
    cross_chain_amount: u64,
    fee_data: Option<FeeRecord>,
    fee_top_up: Option<FeeTopUp>,
    attached_value: u64,
) -> std::result::Result<OutboundQuote, CrossChainLayerError> {
    let fee = match (fee_data, fee_top_up) {
        (None, None) => None,
        (base, top_up) => Some(compose_fee(base, &top_up.unwrap_or_default())?),
    };

    let fee_split = fee
        .as_ref()
        .map(|fee| protocol_fees.split_on_receipt(fee))
        .transpose()?;

    let fee = fee.unwrap_or_default();
    let required = total_required(&fee, cross_chain_amount, operation.gas_reserve())
        .map_err(|_| CrossChainLayerError::NotEnoughTon)?;
    if attached_value < required {
        return Err(CrossChainLayerError::NotEnoughTon);
    }

    // `required` did not overflow, so neither do its parts.
    Ok(OutboundQuote {
        required,
        protocol_fee: fee.protocol_fee,
        executor_fee: fee.tac_executor_fee + fee.ton_executor_fee + operation.gas_reserve(),
        fee_split,
        excess: attached_value - required,
    })
}

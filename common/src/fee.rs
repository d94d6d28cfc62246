use anchor_lang::prelude::*;

use crate::error::CodecError;

/// Fee attached to an outbound message.
///
/// `is_round_trip` marks messages that expect a reply on the origin ledger.
/// Those also owe the origin-side protocol and executor fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct FeeRecord {
    pub is_round_trip: bool,
    pub protocol_fee: u64,
    pub tac_executor_fee: u64,
    pub ton_executor_fee: u64,
}

/// Caller-supplied additions on top of a base fee record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct FeeTopUp {
    pub add_protocol_fee: u64,
    pub add_executor_value: u64,
}

/// Registry-level protocol fee constants.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace,
)]
pub struct ProtocolFees {
    /// Charged for the destination (EVM) leg.
    pub tac_protocol_fee: u64,
    /// Charged for the origin (TVM) leg of round-trip messages.
    pub ton_protocol_fee: u64,
}

/// How a received protocol fee is attributed between the two legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct FeeSplit {
    pub fee: FeeRecord,
    pub protocol_fee_for_origin: u64,
    pub protocol_fee_for_destination: u64,
}

impl ProtocolFees {
    pub fn required(&self, is_round_trip: bool) -> u64 {
        if is_round_trip {
            self.tac_protocol_fee.saturating_add(self.ton_protocol_fee)
        } else {
            self.tac_protocol_fee
        }
    }

    pub fn split_on_receipt(&self, fee: &FeeRecord) -> std::result::Result<FeeSplit, CodecError> {
        if fee.protocol_fee < self.required(fee.is_round_trip) {
            return Err(CodecError::NotEnoughProtocolFee);
        }

        Ok(FeeSplit {
            fee: *fee,
            protocol_fee_for_origin: if fee.is_round_trip {
                self.ton_protocol_fee
            } else {
                0
            },
            protocol_fee_for_destination: self.tac_protocol_fee,
        })
    }
}

/// Adds `top_up` onto `base`. An absent base counts as zero.
pub fn compose_fee(
    base: Option<FeeRecord>,
    top_up: &FeeTopUp,
) -> std::result::Result<FeeRecord, CodecError> {
    let base = base.unwrap_or_default();

    Ok(FeeRecord {
        protocol_fee: base
            .protocol_fee
            .checked_add(top_up.add_protocol_fee)
            .ok_or(CodecError::FeeOverflow)?,
        tac_executor_fee: base
            .tac_executor_fee
            .checked_add(top_up.add_executor_value)
            .ok_or(CodecError::FeeOverflow)?,
        ..base
    })
}

/// Everything the caller has to attach for a message to be accepted.
pub fn total_required(
    fee: &FeeRecord,
    cross_chain_amount: u64,
    reserve: u64,
) -> std::result::Result<u64, CodecError> {
    [
        fee.tac_executor_fee,
        fee.ton_executor_fee,
        cross_chain_amount,
        reserve,
    ]
    .into_iter()
    .try_fold(fee.protocol_fee, u64::checked_add)
    .ok_or(CodecError::FeeOverflow)
}

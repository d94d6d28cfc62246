use anchor_lang::prelude::*;
use ccl_common::Message;

use crate::{error::CrossChainLayerError, evm_to_tvm::constants::DISPATCH_FEE_RESERVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorFeePayout {
    /// Paid from the locked balance.
    Lamports(u64),
    /// Minted by the protocol authority.
    Token { mint: Pubkey, amount: u64 },
}

/// Value flows of a dispatch, computed before anything moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Sum of entries funded by the executor's attached value.
    pub from_attached: u64,
    /// Sum released from the locked balance, lamport executor fee included.
    pub unlocked: u64,
    pub executor_fee: ExecutorFeePayout,
    /// Attached value returned to the response address.
    pub excess: u64,
}

/// Decides whether `message` can be dispatched as a whole.
///
/// Either every entry is funded or the call fails and nothing is forwarded.
pub fn plan_dispatch(
    message: &Message,
    attached_value: u64,
    locked_value: u64,
) -> std::result::Result<DispatchPlan, CrossChainLayerError> {
    let mut from_attached: u64 = 0;
    let mut unlocked: u64 = 0;

    for entry in &message.entries {
        let bucket = if entry.needs_value_unlock {
            &mut unlocked
        } else {
            &mut from_attached
        };
        *bucket = bucket
            .checked_add(entry.value)
            .ok_or(CrossChainLayerError::ArithmeticOverflow)?;
    }

    let executor_fee = match message.executor_fee_token {
        Some(mint) => ExecutorFeePayout::Token {
            mint,
            amount: message.executor_fee_value,
        },
        None => {
            unlocked = unlocked
                .checked_add(message.executor_fee_value)
                .ok_or(CrossChainLayerError::ArithmeticOverflow)?;
            ExecutorFeePayout::Lamports(message.executor_fee_value)
        }
    };

    let needed = from_attached
        .checked_add(DISPATCH_FEE_RESERVE)
        .ok_or(CrossChainLayerError::NotEnoughTon)?;
    if attached_value < needed {
        return Err(CrossChainLayerError::NotEnoughTon);
    }
    if locked_value < unlocked {
        return Err(CrossChainLayerError::InsufficientBalance);
    }

    Ok(DispatchPlan {
        from_attached,
        unlocked,
        executor_fee,
        excess: attached_value - needed,
    })
}

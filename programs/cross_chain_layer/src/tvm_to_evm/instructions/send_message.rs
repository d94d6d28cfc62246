use anchor_lang::prelude::*;
use ccl_common::{FeeRecord, FeeSplit, FeeTopUp};

use crate::{
    common::{
        deposit_to_vault, withdraw_from_vault, CrossChainLayer, CROSS_CHAIN_LAYER_SEED, VAULT_SEED,
    },
    tvm_to_evm::{quote_outbound, OperationType},
};

#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct SendMessageArgs {
    pub query_id: u64,
    /// 32-bit operation tag, see `OperationType`.
    pub operation_type: u32,
    /// Lamports escrowed for delivery on the destination ledger.
    pub cross_chain_amount: u64,
    pub fee_data: Option<FeeRecord>,
    pub fee_top_up: Option<FeeTopUp>,
    /// Lamports the sender puts up for this submission.
    pub attached_value: u64,
    /// Opaque payload picked up by the sequencer.
    pub payload: Vec<u8>,
}

/// Result returned to the caller, readable by adapters through return data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum SendStatus {
    Accepted { excess: u64 },
    Rejected { exit_code: u32 },
}

#[derive(Accounts)]
pub struct SendMessage<'info> {
    /// Origin of the message. Pays `attached_value`.
    #[account(mut)]
    pub sender: Signer<'info>,

    /// Receives the excess refund and error notifications.
    /// CHECK: Any account may be nominated by the sender.
    #[account(mut)]
    pub response: UncheckedAccount<'info>,

    #[account(mut, seeds = [CROSS_CHAIN_LAYER_SEED], bump)]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn send_message_handler(ctx: Context<SendMessage>, args: SendMessageArgs) -> Result<SendStatus> {
    let operation = OperationType::try_from(args.operation_type)?;

    let quote = match quote_outbound(
        &ctx.accounts.cross_chain_layer.protocol_fees,
        operation,
        args.cross_chain_amount,
        args.fee_data,
        args.fee_top_up,
        args.attached_value,
    ) {
        Ok(quote) => quote,
        Err(error) => {
            msg!("Outbound message {} rejected: {}", args.query_id, error);
            emit!(ErrorNotification {
                query_id: args.query_id,
                operation_type: args.operation_type,
                exit_code: error.exit_code(),
                response_address: ctx.accounts.response.key(),
                payload: args.payload,
            });
            return Ok(SendStatus::Rejected {
                exit_code: error.exit_code(),
            });
        }
    };

    deposit_to_vault(
        &ctx.accounts.system_program,
        ctx.accounts.sender.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        args.attached_value,
    )?;

    let ccl = &mut ctx.accounts.cross_chain_layer;
    ccl.add_protocol_fee(quote.protocol_fee)?;
    ccl.add_executor_fee(quote.executor_fee)?;
    ccl.lock_value(args.cross_chain_amount)?;

    emit!(MessageSent {
        operation_type: args.operation_type,
        query_id: args.query_id,
        origin: ctx.accounts.sender.key(),
        cross_chain_amount: args.cross_chain_amount,
        fee_split: quote.fee_split,
        payload: args.payload,
    });

    if quote.excess > 0 {
        withdraw_from_vault(
            &ctx.accounts.system_program,
            ctx.accounts.vault.to_account_info(),
            ctx.bumps.vault,
            ctx.accounts.response.to_account_info(),
            quote.excess,
        )?;
        emit!(Excesses {
            query_id: args.query_id,
            response_address: ctx.accounts.response.key(),
            amount: quote.excess,
        });
    }

    Ok(SendStatus::Accepted {
        excess: quote.excess,
    })
}

/// Log entry picked up by the sequencer.
#[event]
pub struct MessageSent {
    pub operation_type: u32,
    pub query_id: u64,
    pub origin: Pubkey,
    pub cross_chain_amount: u64,
    pub fee_split: Option<FeeSplit>,
    pub payload: Vec<u8>,
}

/// Echo of a rejected submission, addressed to the nominated response account.
#[event]
pub struct ErrorNotification {
    pub query_id: u64,
    pub operation_type: u32,
    pub exit_code: u32,
    pub response_address: Pubkey,
    pub payload: Vec<u8>,
}

#[event]
pub struct Excesses {
    pub query_id: u64,
    pub response_address: Pubkey,
    pub amount: u64,
}

use anchor_lang::prelude::*;
use ccl_common::{Message, Proof};

use crate::{
    common::{
        can_receive_all, deposit_to_vault, CrossChainLayer, CROSS_CHAIN_LAYER_SEED, VAULT_SEED,
    },
    error::CrossChainLayerError,
    evm_to_tvm::{ActivationParams, ExecutorGuard, EXECUTOR_GUARD_SEED},
};

#[derive(Accounts)]
#[instruction(message_hash: [u8; 32], message: Message, proof: Proof, params: ActivationParams)]
pub struct ProveMessage<'info> {
    /// The executor claiming the message. Pays for the guard on first use and
    /// attaches value for the dispatch.
    #[account(mut)]
    pub executor: Signer<'info>,

    #[account(seeds = [CROSS_CHAIN_LAYER_SEED], bump)]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    /// Replay guard for this message, created lazily and kept forever.
    #[account(
        init_if_needed,
        payer = executor,
        space = 8 + ExecutorGuard::space(&message),
        seeds = [EXECUTOR_GUARD_SEED, message_hash.as_ref()],
        bump
    )]
    pub executor_guard: Account<'info, ExecutorGuard>,

    /// CHECK: Only its balance is read, to make sure dispatch can pay it.
    #[account(address = params.fee_to @ CrossChainLayerError::DestinationMismatch)]
    pub fee_to: UncheckedAccount<'info>,

    /// CHECK: Only its balance is read, to make sure a bounce can refund it.
    #[account(address = params.response_address @ CrossChainLayerError::DestinationMismatch)]
    pub response: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn prove_message_handler(
    ctx: Context<ProveMessage>,
    message_hash: [u8; 32],
    message: Message,
    proof: Proof,
    params: ActivationParams,
) -> Result<()> {
    // The guard address is derived from the caller's hash, so it must match
    // the message actually supplied.
    require!(
        message.leaf_hash() == message_hash,
        CrossChainLayerError::InvalidMessageHash
    );

    let lamport_fee = match message.executor_fee_token {
        Some(_) => 0,
        None => message.executor_fee_value,
    };
    let fee_to = ctx.accounts.fee_to.to_account_info();
    let response = ctx.accounts.response.to_account_info();
    require!(
        can_receive_all(
            &[(&fee_to, lamport_fee), (&response, params.attached_value)],
            &Rent::get()?,
        ),
        CrossChainLayerError::DestinationRejected
    );

    let guard = &mut ctx.accounts.executor_guard;
    if !guard.is_initialized() {
        **guard = ExecutorGuard::new(ctx.accounts.cross_chain_layer.key(), message_hash, message);
    }

    let now = Clock::get()?.unix_timestamp;
    let executor = ctx.accounts.executor.key();
    let request = guard.activate(
        executor,
        &params,
        &proof,
        &ctx.accounts.cross_chain_layer.registry,
        now,
    )?;

    deposit_to_vault(
        &ctx.accounts.system_program,
        ctx.accounts.executor.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        request.attached_value,
    )?;

    emit!(MessageProved {
        message_hash,
        executor,
        fee_to: request.fee_to,
        root: request.root,
        attached_value: request.attached_value,
        query_id: request.query_id,
    });

    Ok(())
}

#[event]
pub struct MessageProved {
    pub message_hash: [u8; 32],
    pub executor: Pubkey,
    pub fee_to: Pubkey,
    pub root: [u8; 32],
    pub attached_value: u64,
    pub query_id: u64,
}

use anchor_lang::prelude::*;
use ccl_common::ProtocolFees;

use crate::{
    common::{
        deposit_to_vault, CrossChainLayer, CROSS_CHAIN_LAYER_SEED, MIN_EPOCH_DELAY, VAULT_SEED,
    },
    error::CrossChainLayerError,
    evm_to_tvm::RootRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct InitializeParams {
    pub sequencer_multisig: Pubkey,
    pub protocol_fees: ProtocolFees,
    /// Seconds between a rotation and the next expected voting time.
    pub epoch_delay: u32,
    /// Number of roots kept valid at the same time.
    pub max_roots_size: u8,
}

/// Accounts struct for the initialize instruction that creates the protocol state.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account that pays for the state account and the vault's rent.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The protocol state account being initialized.
    /// - Uses PDA with CROSS_CHAIN_LAYER_SEED for deterministic address
    /// - Space allocated for state (8-byte discriminator + CrossChainLayer::INIT_SPACE)
    #[account(
        init,
        payer = payer,
        seeds = [CROSS_CHAIN_LAYER_SEED],
        bump,
        space = 8 + CrossChainLayer::INIT_SPACE
    )]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    /// System-owned PDA holding every lamport the protocol has custody of.
    /// Funded to the rent-exempt minimum here so later withdrawals never
    /// leave it below that.
    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    /// The admin of the protocol. Must sign so the initializer controls it.
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    require!(
        params.epoch_delay >= MIN_EPOCH_DELAY,
        CrossChainLayerError::EpochDelayTooShort
    );

    let now = Clock::get()?.unix_timestamp;
    let registry = RootRegistry::new(params.epoch_delay, params.max_roots_size, now)?;

    let rent_exempt = Rent::get()?.minimum_balance(0);
    deposit_to_vault(
        &ctx.accounts.system_program,
        ctx.accounts.payer.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        rent_exempt.saturating_sub(ctx.accounts.vault.lamports()),
    )?;

    *ctx.accounts.cross_chain_layer = CrossChainLayer {
        admin: ctx.accounts.admin.key(),
        new_admin: None,
        sequencer_multisig: params.sequencer_multisig,
        protocol_fees: params.protocol_fees,
        protocol_fee_supply: 0,
        executor_fee_supply: 0,
        locked_value: 0,
        registry,
    };

    Ok(())
}

use anchor_lang::prelude::*;

use crate::common::{CrossChainLayer, SetConfig, CROSS_CHAIN_LAYER_SEED};

/// Accounts struct for the second phase of an admin change.
#[derive(Accounts)]
pub struct ConfirmNewAdmin<'info> {
    #[account(mut, seeds = [CROSS_CHAIN_LAYER_SEED], bump)]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    /// Must match the proposed admin.
    pub new_admin: Signer<'info>,
}

/// Proposes `new_admin`. Nothing changes until it confirms.
pub fn change_admin_handler(ctx: Context<SetConfig>, new_admin: Option<Pubkey>) -> Result<()> {
    let new_admin = ctx.accounts.cross_chain_layer.propose_admin(new_admin)?;

    emit!(AdminChangeProposed {
        admin: ctx.accounts.admin.key(),
        new_admin,
    });

    Ok(())
}

pub fn cancel_changing_admin_handler(ctx: Context<SetConfig>) -> Result<()> {
    if let Some(new_admin) = ctx.accounts.cross_chain_layer.cancel_admin_change() {
        emit!(AdminChangeCancelled { new_admin });
    }

    Ok(())
}

pub fn confirm_new_admin_handler(ctx: Context<ConfirmNewAdmin>) -> Result<()> {
    let new_admin = ctx.accounts.new_admin.key();
    let old_admin = ctx.accounts.cross_chain_layer.confirm_admin(&new_admin)?;

    emit!(AdminChanged {
        old_admin,
        new_admin,
    });

    Ok(())
}

#[event]
pub struct AdminChangeProposed {
    pub admin: Pubkey,
    pub new_admin: Pubkey,
}

#[event]
pub struct AdminChangeCancelled {
    pub new_admin: Pubkey,
}

#[event]
pub struct AdminChanged {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}

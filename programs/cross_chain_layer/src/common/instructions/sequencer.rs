use anchor_lang::prelude::*;

use crate::{
    common::{CrossChainLayer, CROSS_CHAIN_LAYER_SEED},
    error::CrossChainLayerError,
};

/// Accounts struct for sequencer-only configuration.
#[derive(Accounts)]
pub struct SequencerConfig<'info> {
    #[account(
        mut,
        has_one = sequencer_multisig @ CrossChainLayerError::NotFromSequencerMultisig,
        seeds = [CROSS_CHAIN_LAYER_SEED],
        bump
    )]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    pub sequencer_multisig: Signer<'info>,
}

/// Hands the sequencer role to `new_sequencer_multisig`.
pub fn change_sequencer_multisig_handler(
    ctx: Context<SequencerConfig>,
    new_sequencer_multisig: Pubkey,
) -> Result<()> {
    let ccl = &mut ctx.accounts.cross_chain_layer;
    let old_sequencer_multisig =
        std::mem::replace(&mut ccl.sequencer_multisig, new_sequencer_multisig);

    emit!(SequencerMultisigChanged {
        old_sequencer_multisig,
        new_sequencer_multisig,
    });

    Ok(())
}

#[event]
pub struct SequencerMultisigChanged {
    pub old_sequencer_multisig: Pubkey,
    pub new_sequencer_multisig: Pubkey,
}

use anchor_lang::prelude::*;

use crate::{
    common::{SetConfig, MIN_EPOCH_DELAY},
    error::CrossChainLayerError,
};

/// Updates the delay applied on the next root rotation.
pub fn set_epoch_delay_handler(ctx: Context<SetConfig>, epoch_delay: u32) -> Result<()> {
    require!(
        epoch_delay >= MIN_EPOCH_DELAY,
        CrossChainLayerError::EpochDelayTooShort
    );

    let registry = &mut ctx.accounts.cross_chain_layer.registry;
    let old_epoch_delay = registry.epoch.epoch_delay;
    registry.set_epoch_delay(epoch_delay);

    emit!(EpochDelayUpdated {
        old_epoch_delay,
        epoch_delay,
    });

    Ok(())
}

#[event]
pub struct EpochDelayUpdated {
    pub old_epoch_delay: u32,
    pub epoch_delay: u32,
}

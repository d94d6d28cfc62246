use anchor_lang::prelude::*;

use crate::common::SetConfig;

/// Updates how many roots are held at once. Shrinking evicts the oldest.
pub fn set_max_roots_size_handler(ctx: Context<SetConfig>, max_roots_size: u8) -> Result<()> {
    let evicted = ctx
        .accounts
        .cross_chain_layer
        .registry
        .set_max_roots_size(max_roots_size)?;

    emit!(MaxRootsSizeUpdated {
        max_roots_size,
        evicted_roots: evicted.iter().map(|held| held.root).collect(),
    });

    Ok(())
}

#[event]
pub struct MaxRootsSizeUpdated {
    pub max_roots_size: u8,
    pub evicted_roots: Vec<[u8; 32]>,
}

use anchor_lang::prelude::*;

use crate::{
    common::{CrossChainLayer, CROSS_CHAIN_LAYER_SEED},
    error::CrossChainLayerError,
};

/// Accounts struct for admin-only instructions.
#[derive(Accounts)]
pub struct SetConfig<'info> {
    /// The protocol state holding the configuration.
    #[account(
        mut,
        has_one = admin @ CrossChainLayerError::NotFromAdmin,
        seeds = [CROSS_CHAIN_LAYER_SEED],
        bump
    )]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    /// The admin authorized to update configuration.
    pub admin: Signer<'info>,
}

pub mod admin;
pub mod set_epoch_delay;
pub mod set_max_roots_size;
pub mod set_protocol_fees;

pub use admin::*;
pub use set_epoch_delay::*;
pub use set_max_roots_size::*;
pub use set_protocol_fees::*;

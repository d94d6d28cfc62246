use anchor_lang::prelude::*;
use ccl_common::ProtocolFees;

use crate::common::SetConfig;

/// Replaces both protocol fee components.
pub fn set_protocol_fees_handler(ctx: Context<SetConfig>, protocol_fees: ProtocolFees) -> Result<()> {
    let old = ctx.accounts.cross_chain_layer.protocol_fees;
    ctx.accounts.cross_chain_layer.protocol_fees = protocol_fees;

    emit!(ProtocolFeesUpdated {
        old_tac_protocol_fee: old.tac_protocol_fee,
        old_ton_protocol_fee: old.ton_protocol_fee,
        tac_protocol_fee: protocol_fees.tac_protocol_fee,
        ton_protocol_fee: protocol_fees.ton_protocol_fee,
    });

    Ok(())
}

#[event]
pub struct ProtocolFeesUpdated {
    pub old_tac_protocol_fee: u64,
    pub old_ton_protocol_fee: u64,
    pub tac_protocol_fee: u64,
    pub ton_protocol_fee: u64,
}

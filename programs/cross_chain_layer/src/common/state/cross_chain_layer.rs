use anchor_lang::prelude::*;
use ccl_common::ProtocolFees;

use crate::{error::CrossChainLayerError, evm_to_tvm::RootRegistry};

/// Singleton state of the protocol.
///
/// Owns the root registry, the protocol fee supply and the accounting of
/// lamports the vault holds on behalf of outbound submissions.
#[account]
#[derive(Debug, PartialEq, Eq, InitSpace)]
pub struct CrossChainLayer {
    /// Can update fees, the epoch delay and the root capacity.
    pub admin: Pubkey,
    /// Proposed admin awaiting confirmation.
    pub new_admin: Option<Pubkey>,
    /// Only account allowed to commit roots and collect protocol fees.
    pub sequencer_multisig: Pubkey,
    pub protocol_fees: ProtocolFees,
    /// Protocol fees collected since the last withdrawal.
    pub protocol_fee_supply: u64,
    /// Executor fees, gas reserves and unclaimed bounce refunds held for the sequencer.
    pub executor_fee_supply: u64,
    /// Lamports escrowed by outbound submissions, releasable by inbound entries.
    pub locked_value: u64,
    pub registry: RootRegistry,
}

impl CrossChainLayer {
    pub fn add_protocol_fee(&mut self, amount: u64) -> Result<()> {
        self.protocol_fee_supply = self
            .protocol_fee_supply
            .checked_add(amount)
            .ok_or(CrossChainLayerError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Empties the fee supply and returns what it held.
    pub fn take_protocol_fee_supply(&mut self) -> Result<u64> {
        require!(
            self.protocol_fee_supply > 0,
            CrossChainLayerError::ZeroFeeSupply
        );
        Ok(std::mem::take(&mut self.protocol_fee_supply))
    }

    pub fn add_executor_fee(&mut self, amount: u64) -> Result<()> {
        self.executor_fee_supply = self
            .executor_fee_supply
            .checked_add(amount)
            .ok_or(CrossChainLayerError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn take_executor_fee_supply(&mut self) -> Result<u64> {
        require!(
            self.executor_fee_supply > 0,
            CrossChainLayerError::ZeroFeeSupply
        );
        Ok(std::mem::take(&mut self.executor_fee_supply))
    }

    /// Lamports of the vault owned by the protocol, above its rent-exempt minimum.
    pub fn tracked_value(&self) -> u64 {
        self.protocol_fee_supply
            .saturating_add(self.executor_fee_supply)
            .saturating_add(self.locked_value)
    }

    pub fn lock_value(&mut self, amount: u64) -> Result<()> {
        self.locked_value = self
            .locked_value
            .checked_add(amount)
            .ok_or(CrossChainLayerError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn unlock_value(&mut self, amount: u64) -> Result<()> {
        self.locked_value = self
            .locked_value
            .checked_sub(amount)
            .ok_or(CrossChainLayerError::InsufficientBalance)?;
        Ok(())
    }

    pub fn propose_admin(&mut self, new_admin: Option<Pubkey>) -> Result<Pubkey> {
        let new_admin = new_admin.ok_or(CrossChainLayerError::NewAdminAddressIsNone)?;
        self.new_admin = Some(new_admin);
        Ok(new_admin)
    }

    pub fn cancel_admin_change(&mut self) -> Option<Pubkey> {
        self.new_admin.take()
    }

    /// Promotes the proposed admin. Returns the replaced admin.
    pub fn confirm_admin(&mut self, signer: &Pubkey) -> Result<Pubkey> {
        require!(
            self.new_admin.as_ref() == Some(signer),
            CrossChainLayerError::NotFromNewAdmin
        );
        self.new_admin = None;
        Ok(std::mem::replace(&mut self.admin, *signer))
    }
}

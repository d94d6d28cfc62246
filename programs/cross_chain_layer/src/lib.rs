#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use ccl_common::{Message, Proof, ProtocolFees};

pub mod common;
pub mod error;
pub mod evm_to_tvm;
pub mod tvm_to_evm;

#[cfg(test)]
mod test_utils;

use common::*;
use evm_to_tvm::*;
use tvm_to_evm::*;

declare_id!("DMuxRSPXbBmZPZQBVvwLGRpgAzqz8FfhN2dgfSCwSrYY");

#[program]
pub mod cross_chain_layer {
    use super::*;

    // Common

    /// Creates the protocol state and funds the vault to its rent-exempt minimum.
    /// Must be called once during deployment.
    ///
    /// # Arguments
    /// * `ctx`    - The context containing all accounts needed for initialization
    /// * `params` - Sequencer, protocol fees, epoch delay and root capacity
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        initialize_handler(ctx, params)
    }

    /// Replaces the protocol fees charged on outbound messages. Admin only.
    ///
    /// # Arguments
    /// * `ctx`           - The context containing the protocol state and the admin
    /// * `protocol_fees` - New per-leg protocol fees in lamports
    pub fn set_protocol_fees(ctx: Context<SetConfig>, protocol_fees: ProtocolFees) -> Result<()> {
        set_protocol_fees_handler(ctx, protocol_fees)
    }

    /// Changes the delay used to compute the next voting time. Admin only.
    ///
    /// # Arguments
    /// * `ctx`         - The context containing the protocol state and the admin
    /// * `epoch_delay` - Seconds between a root commit and the next voting time
    pub fn set_epoch_delay(ctx: Context<SetConfig>, epoch_delay: u32) -> Result<()> {
        set_epoch_delay_handler(ctx, epoch_delay)
    }

    /// Changes how many roots are kept valid at once. Shrinking evicts the
    /// oldest roots. Admin only.
    ///
    /// # Arguments
    /// * `ctx`            - The context containing the protocol state and the admin
    /// * `max_roots_size` - New capacity of the root registry
    pub fn set_max_roots_size(ctx: Context<SetConfig>, max_roots_size: u8) -> Result<()> {
        set_max_roots_size_handler(ctx, max_roots_size)
    }

    /// Proposes a new admin. The change takes effect once the proposed admin confirms it.
    ///
    /// # Arguments
    /// * `ctx`       - The context containing the protocol state and the admin
    /// * `new_admin` - The proposed admin, `None` is rejected
    pub fn change_admin(ctx: Context<SetConfig>, new_admin: Option<Pubkey>) -> Result<()> {
        change_admin_handler(ctx, new_admin)
    }

    /// Withdraws a pending admin proposal.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the protocol state and the admin
    pub fn cancel_changing_admin(ctx: Context<SetConfig>) -> Result<()> {
        cancel_changing_admin_handler(ctx)
    }

    /// Accepts a pending admin proposal. Must be signed by the proposed admin.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the protocol state and the proposed admin
    pub fn confirm_new_admin(ctx: Context<ConfirmNewAdmin>) -> Result<()> {
        confirm_new_admin_handler(ctx)
    }

    /// Hands the sequencer role to another multisig. Sequencer only.
    ///
    /// # Arguments
    /// * `ctx`                    - The context containing the protocol state and the sequencer
    /// * `new_sequencer_multisig` - The account taking over the sequencer role
    pub fn change_sequencer_multisig(
        ctx: Context<SequencerConfig>,
        new_sequencer_multisig: Pubkey,
    ) -> Result<()> {
        change_sequencer_multisig_handler(ctx, new_sequencer_multisig)
    }

    /// Tops up the protocol fee supply.
    ///
    /// # Arguments
    /// * `ctx`    - The context containing the payer, the protocol state and the vault
    /// * `amount` - Lamports moved into the vault
    pub fn add_protocol_fee(ctx: Context<AddProtocolFee>, amount: u64) -> Result<()> {
        add_protocol_fee_handler(ctx, amount)
    }

    /// Transfers the whole protocol fee supply to the sequencer.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the protocol state, the sequencer and the vault
    pub fn collect_protocol_fee(ctx: Context<CollectFee>) -> Result<()> {
        collect_protocol_fee_handler(ctx)
    }

    /// Transfers the executor fee supply to the sequencer. This covers executor
    /// fees and gas reserves of outbound messages, dispatch reserves and
    /// bounce refunds the response address could not take.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the protocol state, the sequencer and the vault
    pub fn collect_executor_fee(ctx: Context<CollectFee>) -> Result<()> {
        collect_executor_fee_handler(ctx)
    }

    // EVM -> TVM

    /// Commits a Merkle root of an inbound batch and rotates the epoch.
    ///
    /// # Arguments
    /// * `ctx`                      - The context containing the protocol state and the sequencer
    /// * `root`                     - Root of the batch
    /// * `valid_timestamp`          - Time from which proofs against `root` are accepted
    /// * `message_collect_end_time` - End of the collection window the batch covers
    pub fn update_merkle_root(
        ctx: Context<SequencerConfig>,
        root: [u8; 32],
        valid_timestamp: i64,
        message_collect_end_time: i64,
    ) -> Result<()> {
        update_merkle_root_handler(ctx, root, valid_timestamp, message_collect_end_time)
    }

    /// Proves that a message belongs to a committed batch and claims it for the executor.
    /// The executor guard for the message is created on first use.
    ///
    /// # Arguments
    /// * `ctx`          - The transaction context
    /// * `message_hash` - Leaf hash of `message`, used to derive the guard address
    /// * `message`      - The inbound message being claimed
    /// * `proof`        - Merkle proof of `message_hash` against a held root
    /// * `params`       - Fee receiver, response address, attached value and query id
    pub fn prove_message(
        ctx: Context<ProveMessage>,
        message_hash: [u8; 32],
        message: Message,
        proof: Proof,
        params: ActivationParams,
    ) -> Result<()> {
        prove_message_handler(ctx, message_hash, message, proof, params)
    }

    /// Forwards every entry of a proven message, or bounces it back to the
    /// response address when it cannot be executed as a whole.
    ///
    /// # Arguments
    /// * `ctx` - The transaction context. Remaining accounts are the entry destinations
    pub fn dispatch_message<'a, 'info>(
        ctx: Context<'a, '_, 'info, 'info, DispatchMessage<'info>>,
    ) -> Result<DispatchStatus> {
        dispatch_message_handler(ctx)
    }

    // TVM -> EVM

    /// Accepts an outbound message for the sequencer, or notifies the
    /// response address when it is rejected.
    ///
    /// # Arguments
    /// * `ctx`  - The context containing the sender, the response address and the vault
    /// * `args` - Operation, amounts, fee record and payload of the message
    pub fn send_message(ctx: Context<SendMessage>, args: SendMessageArgs) -> Result<SendStatus> {
        send_message_handler(ctx, args)
    }
}

use anchor_lang::prelude::*;
use ccl_common::{Message, Proof};

use crate::{
    error::CrossChainLayerError,
    evm_to_tvm::{constants::EXECUTOR_GUARD_SEED, RootRegistry},
    ID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum GuardStatus {
    Unspent,
    /// Proven and waiting for dispatch. Blocks any further activation.
    Pending,
    Spent,
}

/// Everything dispatch needs to settle a proven message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct DispatchRequest {
    pub executor: Pubkey,
    /// Receives the executor fee.
    pub fee_to: Pubkey,
    /// Receives refunds and error notifications.
    pub response_address: Pubkey,
    /// Root the proof was checked against.
    pub root: [u8; 32],
    /// Lamports the executor moved into the vault on activation.
    pub attached_value: u64,
    pub query_id: u64,
}

/// Executor-chosen parameters of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct ActivationParams {
    pub fee_to: Pubkey,
    pub response_address: Pubkey,
    pub attached_value: u64,
    pub query_id: u64,
}

/// One-shot replay guard for a single message, addressed by the message hash.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct ExecutorGuard {
    pub cross_chain_layer: Pubkey,
    pub message_hash: [u8; 32],
    pub status: GuardStatus,
    pub last_executor: Option<Pubkey>,
    pub pending: Option<DispatchRequest>,
    pub payload: Message,
}

impl ExecutorGuard {
    pub fn space(message: &Message) -> usize {
        32 + 32 + 1 + (1 + 32) + (1 + DispatchRequest::INIT_SPACE) + message.space()
    }

    pub fn new(cross_chain_layer: Pubkey, message_hash: [u8; 32], payload: Message) -> Self {
        Self {
            cross_chain_layer,
            message_hash,
            status: GuardStatus::Unspent,
            last_executor: None,
            pending: None,
            payload,
        }
    }

    /// A freshly allocated guard deserializes to all zeroes.
    pub fn is_initialized(&self) -> bool {
        self.message_hash != [0u8; 32]
    }

    /// Verifies an executor's claim and moves the guard to `Pending`.
    ///
    /// Checks run cheapest first: replay, executor set, fee, then the proof.
    pub fn activate(
        &mut self,
        executor: Pubkey,
        params: &ActivationParams,
        proof: &Proof,
        registry: &RootRegistry,
        now: i64,
    ) -> Result<DispatchRequest> {
        require!(
            self.status == GuardStatus::Unspent,
            CrossChainLayerError::AlreadySpent
        );
        require!(
            !self.payload.entries.is_empty(),
            CrossChainLayerError::EmptyMessage
        );
        require!(
            self.payload.is_valid_executor(&executor),
            CrossChainLayerError::UnauthorizedExecutor
        );
        require!(
            params.attached_value >= self.payload.executor_fee_value,
            CrossChainLayerError::InsufficientExecutorFee
        );

        let root = proof
            .compute_root(&self.message_hash)
            .map_err(CrossChainLayerError::from)?;
        registry.check_root(&root, now)?;

        let request = DispatchRequest {
            executor,
            fee_to: params.fee_to,
            response_address: params.response_address,
            root,
            attached_value: params.attached_value,
            query_id: params.query_id,
        };
        self.status = GuardStatus::Pending;
        self.last_executor = Some(executor);
        self.pending = Some(request);

        Ok(request)
    }

    pub fn pending_request(&self) -> Result<&DispatchRequest> {
        require!(
            self.status == GuardStatus::Pending,
            CrossChainLayerError::NotFromExecutor
        );
        self.pending
            .as_ref()
            .ok_or_else(|| error!(CrossChainLayerError::NotFromExecutor))
    }

    /// Compensating edge: restores the guard to its pre-activation state so
    /// the message can be proven again.
    pub fn revert_on_bounce(&mut self) -> Result<DispatchRequest> {
        let request = *self.pending_request()?;
        self.status = GuardStatus::Unspent;
        self.last_executor = None;
        self.pending = None;
        Ok(request)
    }

    pub fn complete(&mut self) -> Result<DispatchRequest> {
        let request = *self.pending_request()?;
        self.status = GuardStatus::Spent;
        self.pending = None;
        Ok(request)
    }
}

/// Address of the guard for `message_hash`.
pub fn executor_guard_address(message_hash: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EXECUTOR_GUARD_SEED, message_hash], &ID)
}

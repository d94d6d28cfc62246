use anchor_lang::{prelude::*, solana_program::program_option::COption};
use anchor_spl::token_interface::{self, Mint, MintTo, TokenAccount, TokenInterface};
use ccl_common::Message;

use crate::{
    common::{
        can_receive, can_receive_all, withdraw_from_vault, CrossChainLayer, AUTHORITY_SEED,
        CROSS_CHAIN_LAYER_SEED, VAULT_SEED,
    },
    error::CrossChainLayerError,
    evm_to_tvm::{
        plan_dispatch, DispatchPlan, DispatchRequest, ExecutorFeePayout, ExecutorGuard,
        DISPATCH_FEE_RESERVE, EXECUTOR_GUARD_SEED,
    },
};

/// Outcome of a dispatch, readable through return data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum DispatchStatus {
    Executed { excess: u64 },
    Bounced { exit_code: u32 },
}

/// Accounts struct for settling a proven message.
///
/// The entry destinations are passed as writable remaining accounts, in the
/// order of the message entries. The fee token accounts are only read for
/// messages that pay the executor in tokens. Any problem with them bounces
/// the message instead of failing the call.
#[derive(Accounts)]
pub struct DispatchMessage<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut, seeds = [CROSS_CHAIN_LAYER_SEED], bump)]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [EXECUTOR_GUARD_SEED, executor_guard.message_hash.as_ref()],
        bump,
        has_one = cross_chain_layer
    )]
    pub executor_guard: Account<'info, ExecutorGuard>,

    /// Receives the executor fee when it is paid in lamports, owns the fee
    /// token account otherwise.
    /// CHECK: Compared against the pending request in the handler.
    #[account(mut)]
    pub fee_to: UncheckedAccount<'info>,

    /// Receives refunds.
    /// CHECK: Compared against the pending request in the handler.
    #[account(mut)]
    pub response: UncheckedAccount<'info>,

    /// Mint authority of executor fee tokens.
    /// CHECK: PDA only used as a CPI signer.
    #[account(seeds = [AUTHORITY_SEED], bump)]
    pub authority: UncheckedAccount<'info>,

    /// CHECK: Decoded in the handler, see `fee_token_mintable`.
    #[account(mut)]
    pub fee_mint: Option<UncheckedAccount<'info>>,

    /// CHECK: Decoded in the handler, see `fee_token_mintable`.
    #[account(mut)]
    pub fee_token_account: Option<UncheckedAccount<'info>>,

    pub token_program: Option<Interface<'info, TokenInterface>>,

    pub system_program: Program<'info, System>,
}

pub fn dispatch_message_handler<'a, 'info>(
    ctx: Context<'a, '_, 'info, 'info, DispatchMessage<'info>>,
) -> Result<DispatchStatus> {
    let request = *ctx.accounts.executor_guard.pending_request()?;
    let message = ctx.accounts.executor_guard.payload.clone();
    let message_hash = ctx.accounts.executor_guard.message_hash;
    let destinations = ctx.remaining_accounts;

    // Everything checked before evaluation is fixed by the pending request,
    // so an honest caller can always pass it.
    require_keys_eq!(
        ctx.accounts.fee_to.key(),
        request.fee_to,
        CrossChainLayerError::DestinationMismatch
    );
    require_keys_eq!(
        ctx.accounts.response.key(),
        request.response_address,
        CrossChainLayerError::DestinationMismatch
    );
    require!(
        destinations.len() == message.entries.len()
            && destinations
                .iter()
                .zip(&message.entries)
                .all(|(account, entry)| account.key() == entry.destination),
        CrossChainLayerError::DestinationMismatch
    );

    let now = Clock::get()?.unix_timestamp;
    let rent = Rent::get()?;
    let evaluation =
        evaluate_dispatch(ctx.accounts, destinations, &message, &request, now, &rent);
    let plan = match evaluation {
        Ok(plan) => plan,
        Err(error) => {
            ctx.accounts.executor_guard.revert_on_bounce()?;
            let refunded =
                refund_or_retain(ctx.accounts, ctx.bumps.vault, request.attached_value, &rent)?;

            msg!("Message {} bounced: {}", hex::encode(message_hash), error);
            emit!(ExecutorErrorNotification {
                message_hash,
                query_id: request.query_id,
                exit_code: error.exit_code(),
                response_address: request.response_address,
                refunded,
            });
            return Ok(DispatchStatus::Bounced {
                exit_code: error.exit_code(),
            });
        }
    };

    for (entry, destination) in message.entries.iter().zip(destinations) {
        withdraw_from_vault(
            &ctx.accounts.system_program,
            ctx.accounts.vault.to_account_info(),
            ctx.bumps.vault,
            destination.clone(),
            entry.value,
        )?;
        emit!(EntryForwarded {
            message_hash,
            operation_id: entry.operation_id,
            destination: entry.destination,
            value: entry.value,
            body: entry.body.clone(),
            payload_number: entry.payload_number,
        });
    }

    let ccl = &mut ctx.accounts.cross_chain_layer;
    ccl.unlock_value(plan.unlocked)?;
    ccl.add_executor_fee(DISPATCH_FEE_RESERVE)?;

    match plan.executor_fee {
        ExecutorFeePayout::Lamports(amount) => {
            withdraw_from_vault(
                &ctx.accounts.system_program,
                ctx.accounts.vault.to_account_info(),
                ctx.bumps.vault,
                ctx.accounts.fee_to.to_account_info(),
                amount,
            )?;
        }
        ExecutorFeePayout::Token { mint, amount } => {
            mint_executor_fee(ctx.accounts, ctx.bumps.authority, amount)?;
            msg!("Minted {} of {} to {}", amount, mint, request.fee_to);
        }
    }

    let refunded = refund_or_retain(ctx.accounts, ctx.bumps.vault, plan.excess, &rent)?;

    ctx.accounts.executor_guard.complete()?;

    emit!(MessageExecuted {
        message_hash,
        executor: request.executor,
        fee_to: request.fee_to,
        executor_fee_token: message.executor_fee_token,
        executor_fee_value: message.executor_fee_value,
        excess: refunded,
    });

    Ok(DispatchStatus::Executed { excess: refunded })
}

/// Runs every bounce condition. Nothing has moved when this returns.
fn evaluate_dispatch<'info>(
    accounts: &DispatchMessage<'info>,
    destinations: &[AccountInfo<'info>],
    message: &Message,
    request: &DispatchRequest,
    now: i64,
    rent: &Rent,
) -> std::result::Result<DispatchPlan, CrossChainLayerError> {
    accounts
        .cross_chain_layer
        .registry
        .check_root(&request.root, now)?;

    let plan = plan_dispatch(
        message,
        request.attached_value,
        accounts.cross_chain_layer.locked_value,
    )?;

    let lamport_fee = match plan.executor_fee {
        ExecutorFeePayout::Lamports(amount) => amount,
        ExecutorFeePayout::Token { .. } => 0,
    };
    let fee_to = accounts.fee_to.to_account_info();
    let credits: Vec<(&AccountInfo, u64)> = message
        .entries
        .iter()
        .zip(destinations)
        .map(|(entry, destination)| (destination, entry.value))
        .chain(std::iter::once((&fee_to, lamport_fee)))
        .collect();
    if !can_receive_all(&credits, rent) {
        return Err(CrossChainLayerError::DestinationRejected);
    }

    if let ExecutorFeePayout::Token { mint, amount } = plan.executor_fee {
        if !fee_token_mintable(accounts, &mint, &request.fee_to, amount) {
            return Err(CrossChainLayerError::InvalidExecutorFeeToken);
        }
    }

    Ok(plan)
}

/// Whether the protocol authority can mint `amount` of `mint` into the fee
/// token account of `fee_to` with the supplied accounts.
fn fee_token_mintable(
    accounts: &DispatchMessage,
    mint: &Pubkey,
    fee_to: &Pubkey,
    amount: u64,
) -> bool {
    let (Some(fee_mint), Some(token_account), Some(token_program)) = (
        accounts.fee_mint.as_ref(),
        accounts.fee_token_account.as_ref(),
        accounts.token_program.as_ref(),
    ) else {
        return false;
    };

    let token_program = token_program.key();
    if fee_mint.key() != *mint
        || *fee_mint.owner != token_program
        || *token_account.owner != token_program
    {
        return false;
    }

    let (Some(mint_state), Some(account_state)) = (
        decode::<Mint>(fee_mint),
        decode::<TokenAccount>(token_account),
    ) else {
        return false;
    };

    mint_state.is_initialized
        && mint_state.mint_authority == COption::Some(accounts.authority.key())
        && mint_state.supply.checked_add(amount).is_some()
        && account_state.mint == *mint
        && account_state.owner == *fee_to
        && !account_state.is_frozen()
        && account_state.amount.checked_add(amount).is_some()
}

fn decode<T: AccountDeserialize>(account: &AccountInfo) -> Option<T> {
    let data = account.try_borrow_data().ok()?;
    T::try_deserialize(&mut &data[..]).ok()
}

/// Pays `amount` back to the response address. An amount the response
/// address cannot take stays in the vault as executor fee supply.
///
/// Returns the refunded amount.
fn refund_or_retain(
    accounts: &mut DispatchMessage,
    vault_bump: u8,
    amount: u64,
    rent: &Rent,
) -> Result<u64> {
    if can_receive(&accounts.response, amount, rent) {
        withdraw_from_vault(
            &accounts.system_program,
            accounts.vault.to_account_info(),
            vault_bump,
            accounts.response.to_account_info(),
            amount,
        )?;
        return Ok(amount);
    }

    msg!(
        "Response address {} cannot take {}, retained",
        accounts.response.key(),
        amount
    );
    accounts.cross_chain_layer.add_executor_fee(amount)?;
    Ok(0)
}

fn mint_executor_fee<'info>(
    accounts: &DispatchMessage<'info>,
    authority_bump: u8,
    amount: u64,
) -> Result<()> {
    let (Some(mint), Some(to), Some(token_program)) = (
        accounts.fee_mint.as_ref(),
        accounts.fee_token_account.as_ref(),
        accounts.token_program.as_ref(),
    ) else {
        return err!(CrossChainLayerError::InvalidExecutorFeeToken);
    };

    let seeds: &[&[&[u8]]] = &[&[AUTHORITY_SEED, &[authority_bump]]];
    let cpi_context = CpiContext::new_with_signer(
        token_program.to_account_info(),
        MintTo {
            mint: mint.to_account_info(),
            to: to.to_account_info(),
            authority: accounts.authority.to_account_info(),
        },
        seeds,
    );
    token_interface::mint_to(cpi_context, amount)
}

/// One forwarded entry of an executed message.
#[event]
pub struct EntryForwarded {
    pub message_hash: [u8; 32],
    pub operation_id: [u8; 32],
    pub destination: Pubkey,
    pub value: u64,
    pub body: Vec<u8>,
    pub payload_number: u32,
}

#[event]
pub struct MessageExecuted {
    pub message_hash: [u8; 32],
    pub executor: Pubkey,
    pub fee_to: Pubkey,
    pub executor_fee_token: Option<Pubkey>,
    pub executor_fee_value: u64,
    /// Attached value refunded to the response address.
    pub excess: u64,
}

/// Sent to the response address when a proven message bounces.
#[event]
pub struct ExecutorErrorNotification {
    pub message_hash: [u8; 32],
    pub query_id: u64,
    pub exit_code: u32,
    pub response_address: Pubkey,
    /// Zero when the response address could not take the attached value.
    pub refunded: u64,
}

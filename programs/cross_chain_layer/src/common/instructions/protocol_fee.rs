use anchor_lang::prelude::*;

use crate::{
    common::{
        deposit_to_vault, withdraw_from_vault, CrossChainLayer, CROSS_CHAIN_LAYER_SEED, VAULT_SEED,
    },
    error::CrossChainLayerError,
};

#[derive(Accounts)]
pub struct AddProtocolFee<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut, seeds = [CROSS_CHAIN_LAYER_SEED], bump)]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct CollectFee<'info> {
    #[account(
        mut,
        has_one = sequencer_multisig @ CrossChainLayerError::NotFromSequencerMultisig,
        seeds = [CROSS_CHAIN_LAYER_SEED],
        bump
    )]
    pub cross_chain_layer: Account<'info, CrossChainLayer>,

    /// Receives the whole fee supply.
    #[account(mut)]
    pub sequencer_multisig: Signer<'info>,

    #[account(mut, seeds = [VAULT_SEED], bump)]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Tops up the protocol fee supply with `amount` lamports.
pub fn add_protocol_fee_handler(ctx: Context<AddProtocolFee>, amount: u64) -> Result<()> {
    require!(amount > 0, CrossChainLayerError::NotEnoughTon);

    deposit_to_vault(
        &ctx.accounts.system_program,
        ctx.accounts.payer.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        amount,
    )?;
    ctx.accounts.cross_chain_layer.add_protocol_fee(amount)?;

    emit!(ProtocolFeeAdded {
        from: ctx.accounts.payer.key(),
        amount,
        protocol_fee_supply: ctx.accounts.cross_chain_layer.protocol_fee_supply,
    });

    Ok(())
}

/// Sends the accumulated protocol fee supply to the sequencer and resets it.
pub fn collect_protocol_fee_handler(ctx: Context<CollectFee>) -> Result<()> {
    let amount = ctx.accounts.cross_chain_layer.take_protocol_fee_supply()?;

    withdraw_from_vault(
        &ctx.accounts.system_program,
        ctx.accounts.vault.to_account_info(),
        ctx.bumps.vault,
        ctx.accounts.sequencer_multisig.to_account_info(),
        amount,
    )?;

    emit!(ProtocolFeeCollected {
        to: ctx.accounts.sequencer_multisig.key(),
        amount,
    });

    Ok(())
}

/// Sends the executor fees and gas reserves held in the vault to the sequencer.
pub fn collect_executor_fee_handler(ctx: Context<CollectFee>) -> Result<()> {
    let amount = ctx.accounts.cross_chain_layer.take_executor_fee_supply()?;

    withdraw_from_vault(
        &ctx.accounts.system_program,
        ctx.accounts.vault.to_account_info(),
        ctx.bumps.vault,
        ctx.accounts.sequencer_multisig.to_account_info(),
        amount,
    )?;

    emit!(ExecutorFeeCollected {
        to: ctx.accounts.sequencer_multisig.key(),
        amount,
    });

    Ok(())
}

#[event]
pub struct ProtocolFeeAdded {
    pub from: Pubkey,
    pub amount: u64,
    pub protocol_fee_supply: u64,
}

#[event]
pub struct ProtocolFeeCollected {
    pub to: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ExecutorFeeCollected {
    pub to: Pubkey,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    use anchor_lang::{
        solana_program::{
            instruction::{AccountMeta, Instruction},
            system_program,
        },
        InstructionData,
    };
    use solana_keypair::Keypair;
    use solana_message::Message;
    use solana_signer::Signer;
    use solana_transaction::Transaction;

    use ccl_common::FeeRecord;

    use crate::{
        accounts, instruction,
        test_utils::{send_message_ix, setup_program_and_svm, TestEnv},
        tvm_to_evm::{OperationType, SendMessageArgs},
        ID,
    };

    fn collect_ix(env: &TestEnv, data: Vec<u8>) -> Instruction {
        Instruction {
            program_id: ID,
            accounts: accounts::CollectFee {
                cross_chain_layer: env.cross_chain_layer,
                sequencer_multisig: env.sequencer.pubkey(),
                vault: env.vault,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data,
        }
    }

    #[test]
    fn added_fee_is_collected_by_sequencer() {
        let mut env = setup_program_and_svm();
        let amount = 1_000_000;

        let add = Instruction {
            program_id: ID,
            accounts: accounts::AddProtocolFee {
                payer: env.payer.pubkey(),
                cross_chain_layer: env.cross_chain_layer,
                vault: env.vault,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: instruction::AddProtocolFee { amount }.data(),
        };
        let tx = Transaction::new(
            &[&env.payer],
            Message::new(&[add], Some(&env.payer.pubkey())),
            env.svm.latest_blockhash(),
        );
        env.svm.send_transaction(tx).unwrap();
        assert_eq!(env.cross_chain_layer_state().protocol_fee_supply, amount);

        let before = env.lamports(&env.sequencer.pubkey());
        let collect = collect_ix(&env, instruction::CollectProtocolFee {}.data());
        let tx = Transaction::new(
            &[&env.payer, &env.sequencer],
            Message::new(&[collect.clone()], Some(&env.payer.pubkey())),
            env.svm.latest_blockhash(),
        );
        env.svm.send_transaction(tx).unwrap();

        assert_eq!(env.lamports(&env.sequencer.pubkey()) - before, amount);
        assert_eq!(env.cross_chain_layer_state().protocol_fee_supply, 0);

        // Nothing left to collect.
        env.svm.expire_blockhash();
        let tx = Transaction::new(
            &[&env.payer, &env.sequencer],
            Message::new(&[collect], Some(&env.payer.pubkey())),
            env.svm.latest_blockhash(),
        );
        let err = env.svm.send_transaction(tx).unwrap_err();
        assert!(format!("{:?}", err.meta.logs).contains("ZeroFeeSupply"));
    }

    #[test]
    fn executor_fee_supply_is_collected_apart_from_protocol_fee() {
        let mut env = setup_program_and_svm();
        let send = send_message_ix(
            &env,
            &env.payer.pubkey(),
            &env.payer.pubkey(),
            SendMessageArgs {
                query_id: 3,
                operation_type: OperationType::JettonTransfer.tag(),
                cross_chain_amount: 0,
                fee_data: Some(FeeRecord {
                    is_round_trip: false,
                    protocol_fee: 30_000,
                    tac_executor_fee: 2_000,
                    ton_executor_fee: 0,
                }),
                fee_top_up: None,
                attached_value: 42_000,
                payload: vec![],
            },
        );
        env.send(&[send], &[]).unwrap();

        let before = env.lamports(&env.sequencer.pubkey());
        let sequencer = env.sequencer.insecure_clone();
        let collect = collect_ix(&env, instruction::CollectExecutorFee {}.data());
        env.send(&[collect], &[&sequencer]).unwrap();

        let expected = 2_000 + OperationType::JettonTransfer.gas_reserve();
        assert_eq!(env.lamports(&env.sequencer.pubkey()) - before, expected);
        let ccl = env.cross_chain_layer_state();
        assert_eq!(ccl.executor_fee_supply, 0);
        assert_eq!(ccl.protocol_fee_supply, 30_000);
    }

    #[test]
    fn only_sequencer_collects_executor_fee() {
        let mut env = setup_program_and_svm();
        let intruder = Keypair::new();
        env.svm.airdrop(&intruder.pubkey(), 1_000_000_000).unwrap();

        let mut collect = collect_ix(&env, instruction::CollectExecutorFee {}.data());
        collect.accounts[1] = AccountMeta::new(intruder.pubkey(), true);
        let err = env.send(&[collect], &[&intruder]).unwrap_err();

        assert!(format!("{:?}", err.meta.logs).contains("NotFromSequencerMultisig"));
    }
}

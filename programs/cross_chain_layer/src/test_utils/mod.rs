use anchor_lang::{
    prelude::*,
    solana_program::{
        instruction::{AccountMeta, Instruction},
        native_token::LAMPORTS_PER_SOL,
    },
    system_program, InstructionData,
};
use anchor_spl::token_interface::spl_token_2022::{
    solana_program::{program_option::COption, program_pack::Pack},
    state::{Account as TokenAccount, AccountState, Mint},
};
use ccl_common::{Message, MsgEntry, Proof, ProtocolFees};
use litesvm::{types::TransactionResult, LiteSVM};
use solana_account::Account;
use solana_keypair::Keypair;
use solana_message::Message as TransactionMessage;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::{
    accounts,
    common::{
        CrossChainLayer, InitializeParams, AUTHORITY_SEED, CROSS_CHAIN_LAYER_SEED, VAULT_SEED,
    },
    evm_to_tvm::{executor_guard_address, ActivationParams, ExecutorGuard, RootRegistry},
    instruction,
    tvm_to_evm::{OperationType, SendMessageArgs},
    ID,
};

pub const TEST_TIMESTAMP: i64 = 1747440000; // May 16th, 2025
pub const TEST_EPOCH_DELAY: u32 = 60;
pub const TEST_MAX_ROOTS_SIZE: u8 = 4;

pub const TEST_PROTOCOL_FEES: ProtocolFees = ProtocolFees {
    tac_protocol_fee: 20_000,
    ton_protocol_fee: 10_000,
};

impl CrossChainLayer {
    pub fn test_new() -> Self {
        Self {
            admin: Pubkey::new_unique(),
            new_admin: None,
            sequencer_multisig: Pubkey::new_unique(),
            protocol_fees: TEST_PROTOCOL_FEES,
            protocol_fee_supply: 0,
            executor_fee_supply: 0,
            locked_value: 0,
            registry: RootRegistry {
                epoch: Default::default(),
                max_roots_size: TEST_MAX_ROOTS_SIZE,
                roots: vec![],
            },
        }
    }
}

pub struct TestEnv {
    pub svm: LiteSVM,
    pub payer: Keypair,
    pub admin: Keypair,
    pub sequencer: Keypair,
    pub cross_chain_layer: Pubkey,
    pub vault: Pubkey,
}

impl TestEnv {
    /// Sends `instructions` with the payer as fee payer and first signer.
    pub fn send(&mut self, instructions: &[Instruction], signers: &[&Keypair]) -> TransactionResult {
        let mut all_signers = vec![&self.payer];
        all_signers.extend_from_slice(signers);

        let tx = Transaction::new(
            &all_signers[..],
            TransactionMessage::new(instructions, Some(&self.payer.pubkey())),
            self.svm.latest_blockhash(),
        );
        self.svm.send_transaction(tx)
    }

    pub fn lamports(&self, address: &Pubkey) -> u64 {
        self.svm
            .get_account(address)
            .map_or(0, |account| account.lamports)
    }

    pub fn cross_chain_layer_state(&self) -> CrossChainLayer {
        let account = self.svm.get_account(&self.cross_chain_layer).unwrap();
        CrossChainLayer::try_deserialize(&mut &account.data[..]).unwrap()
    }

    pub fn executor_guard_state(&self, address: &Pubkey) -> ExecutorGuard {
        let account = self.svm.get_account(address).unwrap();
        ExecutorGuard::try_deserialize(&mut &account.data[..]).unwrap()
    }
}

pub fn setup_program_and_svm() -> TestEnv {
    let mut svm = LiteSVM::new();
    svm.add_program_from_file(ID, "../../target/deploy/cross_chain_layer.so")
        .unwrap();

    // Create test accounts
    let payer = Keypair::new();
    let admin = Keypair::new();
    let sequencer = Keypair::new();
    svm.airdrop(&payer.pubkey(), LAMPORTS_PER_SOL * 10).unwrap();
    svm.airdrop(&sequencer.pubkey(), LAMPORTS_PER_SOL).unwrap();

    mock_clock(&mut svm, TEST_TIMESTAMP);

    let cross_chain_layer = Pubkey::find_program_address(&[CROSS_CHAIN_LAYER_SEED], &ID).0;
    let vault = Pubkey::find_program_address(&[VAULT_SEED], &ID).0;

    let ix = Instruction {
        program_id: ID,
        accounts: accounts::Initialize {
            payer: payer.pubkey(),
            cross_chain_layer,
            vault,
            admin: admin.pubkey(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: instruction::Initialize {
            params: InitializeParams {
                sequencer_multisig: sequencer.pubkey(),
                protocol_fees: TEST_PROTOCOL_FEES,
                epoch_delay: TEST_EPOCH_DELAY,
                max_roots_size: TEST_MAX_ROOTS_SIZE,
            },
        }
        .data(),
    };

    let tx = Transaction::new(
        &[&payer, &admin],
        TransactionMessage::new(&[ix], Some(&payer.pubkey())),
        svm.latest_blockhash(),
    );
    svm.send_transaction(tx).unwrap();

    TestEnv {
        svm,
        payer,
        admin,
        sequencer,
        cross_chain_layer,
        vault,
    }
}

pub fn mock_clock(svm: &mut LiteSVM, timestamp: i64) {
    let mut clock = svm.get_sysvar::<Clock>();
    clock.unix_timestamp = timestamp;
    svm.set_sysvar::<Clock>(&clock);
}

pub fn update_merkle_root_ix(
    cross_chain_layer: Pubkey,
    sequencer_multisig: Pubkey,
    root: [u8; 32],
    valid_timestamp: i64,
    message_collect_end_time: i64,
) -> Instruction {
    Instruction {
        program_id: ID,
        accounts: accounts::SequencerConfig {
            cross_chain_layer,
            sequencer_multisig,
        }
        .to_account_metas(None),
        data: instruction::UpdateMerkleRoot {
            root,
            valid_timestamp,
            message_collect_end_time,
        }
        .data(),
    }
}

/// Moves the clock to `valid_timestamp` and commits `root` as valid from then.
pub fn commit_root(env: &mut TestEnv, root: [u8; 32], valid_timestamp: i64) {
    mock_clock(&mut env.svm, valid_timestamp);
    let ix = update_merkle_root_ix(
        env.cross_chain_layer,
        env.sequencer.pubkey(),
        root,
        valid_timestamp,
        valid_timestamp,
    );
    let sequencer = env.sequencer.insecure_clone();
    env.send(&[ix], &[&sequencer]).unwrap();
}

/// Single-entry message open to any executor, with no executor fee.
pub fn test_message(destination: Pubkey, value: u64, executor_fee_token: Option<Pubkey>) -> Message {
    test_message_with_fee(destination, value, executor_fee_token, 0)
}

/// Single-entry message open to any executor. A lamport fee is paid from
/// locked value, see `lock_value`.
pub fn test_message_with_fee(
    destination: Pubkey,
    value: u64,
    executor_fee_token: Option<Pubkey>,
    executor_fee_value: u64,
) -> Message {
    Message {
        entries: vec![MsgEntry {
            operation_id: [7u8; 32],
            destination,
            value,
            body: b"deliver".to_vec(),
            payload_number: 0,
            needs_value_unlock: false,
        }],
        valid_executors: vec![],
        executor_fee_token,
        executor_fee_value,
    }
}

/// Proves `message` with the executor as both fee receiver and response address.
pub fn prove_message_ix(
    env: &TestEnv,
    executor: &Pubkey,
    message: &Message,
    proof: Proof,
    attached_value: u64,
) -> Instruction {
    prove_message_with_params_ix(
        env,
        executor,
        message,
        proof,
        ActivationParams {
            fee_to: *executor,
            response_address: *executor,
            attached_value,
            query_id: 1,
        },
    )
}

pub fn prove_message_with_params_ix(
    env: &TestEnv,
    executor: &Pubkey,
    message: &Message,
    proof: Proof,
    params: ActivationParams,
) -> Instruction {
    let message_hash = message.leaf_hash();

    Instruction {
        program_id: ID,
        accounts: accounts::ProveMessage {
            executor: *executor,
            cross_chain_layer: env.cross_chain_layer,
            vault: env.vault,
            executor_guard: executor_guard_address(&message_hash).0,
            fee_to: params.fee_to,
            response: params.response_address,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: instruction::ProveMessage {
            message_hash,
            message: message.clone(),
            proof,
            params,
        }
        .data(),
    }
}

/// Accounts a dispatch needs to mint a token executor fee.
#[derive(Debug, Clone, Copy)]
pub struct FeeTokenAccounts {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub token_program: Pubkey,
}

/// Dispatches a lamport-fee message proven through `prove_message_ix`.
pub fn dispatch_message_ix(
    env: &TestEnv,
    message_hash: &[u8; 32],
    executor: &Pubkey,
    destinations: &[Pubkey],
) -> Instruction {
    dispatch_message_to_ix(env, message_hash, executor, executor, None, destinations)
}

pub fn dispatch_message_to_ix(
    env: &TestEnv,
    message_hash: &[u8; 32],
    fee_to: &Pubkey,
    response: &Pubkey,
    fee_token: Option<FeeTokenAccounts>,
    destinations: &[Pubkey],
) -> Instruction {
    let mut accounts = accounts::DispatchMessage {
        payer: env.payer.pubkey(),
        cross_chain_layer: env.cross_chain_layer,
        vault: env.vault,
        executor_guard: executor_guard_address(message_hash).0,
        fee_to: *fee_to,
        response: *response,
        authority: authority_address(),
        fee_mint: fee_token.map(|fee_token| fee_token.mint),
        fee_token_account: fee_token.map(|fee_token| fee_token.token_account),
        token_program: fee_token.map(|fee_token| fee_token.token_program),
        system_program: system_program::ID,
    }
    .to_account_metas(None);
    accounts.extend(
        destinations
            .iter()
            .map(|destination| AccountMeta::new(*destination, false)),
    );

    Instruction {
        program_id: ID,
        accounts,
        data: instruction::DispatchMessage {}.data(),
    }
}

pub fn send_message_ix(
    env: &TestEnv,
    sender: &Pubkey,
    response: &Pubkey,
    args: SendMessageArgs,
) -> Instruction {
    Instruction {
        program_id: ID,
        accounts: accounts::SendMessage {
            sender: *sender,
            response: *response,
            cross_chain_layer: env.cross_chain_layer,
            vault: env.vault,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: instruction::SendMessage { args }.data(),
    }
}

/// Escrows `amount` through an outbound transfer so inbound entries and
/// lamport executor fees can unlock it.
pub fn lock_value(env: &mut TestEnv, amount: u64) {
    let args = SendMessageArgs {
        query_id: 0,
        operation_type: OperationType::TonTransfer.tag(),
        cross_chain_amount: amount,
        fee_data: None,
        fee_top_up: None,
        attached_value: amount + OperationType::TonTransfer.gas_reserve(),
        payload: vec![],
    };
    let ix = send_message_ix(env, &env.payer.pubkey(), &env.payer.pubkey(), args);
    env.send(&[ix], &[]).unwrap();
}

pub fn authority_address() -> Pubkey {
    Pubkey::find_program_address(&[AUTHORITY_SEED], &ID).0
}

pub fn create_mock_mint(svm: &mut LiteSVM, mint: Pubkey, mint_authority: Pubkey, decimals: u8) {
    let mut mint_data = vec![0u8; Mint::LEN];
    Mint {
        mint_authority: COption::Some(mint_authority),
        supply: 0,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    }
    .pack_into_slice(&mut mint_data);

    svm.set_account(
        mint,
        Account {
            lamports: svm.minimum_balance_for_rent_exemption(Mint::LEN),
            data: mint_data,
            owner: anchor_spl::token_2022::ID,
            executable: false,
            rent_epoch: 0,
        },
    )
    .unwrap();
}

pub fn create_mock_token_account(
    svm: &mut LiteSVM,
    token_account: Pubkey,
    mint: Pubkey,
    owner: Pubkey,
) {
    let mut token_account_data = vec![0u8; TokenAccount::LEN];
    TokenAccount {
        mint,
        owner,
        amount: 0,
        delegate: COption::None,
        state: AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    }
    .pack_into_slice(&mut token_account_data);

    svm.set_account(
        token_account,
        Account {
            lamports: svm.minimum_balance_for_rent_exemption(TokenAccount::LEN),
            data: token_account_data,
            owner: anchor_spl::token_2022::ID,
            executable: false,
            rent_epoch: 0,
        },
    )
    .unwrap();
}

pub fn token_balance(svm: &LiteSVM, token_account: &Pubkey) -> u64 {
    let account = svm.get_account(token_account).unwrap();
    TokenAccount::unpack(&account.data).unwrap().amount
}

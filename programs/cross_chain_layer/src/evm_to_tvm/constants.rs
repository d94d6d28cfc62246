use anchor_lang::prelude::*;

#[constant]
pub const EXECUTOR_GUARD_SEED: &[u8] = b"executor_guard";

/// Lamports a dispatch keeps from the executor's attached value to fund itself.
pub const DISPATCH_FEE_RESERVE: u64 = 10_000;

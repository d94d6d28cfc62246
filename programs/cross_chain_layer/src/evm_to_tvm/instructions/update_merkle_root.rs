use anchor_lang::prelude::*;

use crate::common::SequencerConfig;

/// Commits `root` and rotates the epoch. Only the sequencer multisig may call
/// this, which `SequencerConfig` enforces.
pub fn update_merkle_root_handler(
    ctx: Context<SequencerConfig>,
    root: [u8; 32],
    valid_timestamp: i64,
    message_collect_end_time: i64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let registry = &mut ctx.accounts.cross_chain_layer.registry;

    let rotation = registry.submit_root(root, valid_timestamp, message_collect_end_time, now)?;

    msg!(
        "Root {} committed, valid from {}",
        hex::encode(root),
        valid_timestamp
    );
    emit!(MerkleRootUpdated {
        root,
        valid_timestamp,
        prev_message_collect_end_time: rotation.previous.message_collect_end_time,
        message_collect_end_time,
        prev_epoch: registry.epoch.prev_epoch,
        curr_epoch: registry.epoch.curr_epoch,
        next_voting_time: registry.epoch.next_voting_time,
        evicted_root: rotation.evicted.map(|held| held.root),
    });

    Ok(())
}

#[event]
pub struct MerkleRootUpdated {
    pub root: [u8; 32],
    pub valid_timestamp: i64,
    pub prev_message_collect_end_time: i64,
    pub message_collect_end_time: i64,
    pub prev_epoch: i64,
    pub curr_epoch: i64,
    pub next_voting_time: i64,
    pub evicted_root: Option<[u8; 32]>,
}

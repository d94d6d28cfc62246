use anchor_lang::prelude::*;

use crate::{common::MAX_ROOTS_CAPACITY, error::CrossChainLayerError};

/// Rotation cadence of sequencer commitments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct EpochState {
    /// Time of the rotation before the current one.
    pub prev_epoch: i64,
    /// Time of the latest accepted rotation.
    pub curr_epoch: i64,
    /// When message collection for the latest root closed.
    pub message_collect_end_time: i64,
    /// Earliest time the next root is expected to be voted valid.
    pub next_voting_time: i64,
    /// Seconds between `curr_epoch` and `next_voting_time`.
    pub epoch_delay: u32,
}

/// One sequencer commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct MerkleRoot {
    pub root: [u8; 32],
    /// Proofs against `root` are accepted from this time on.
    pub valid_timestamp: i64,
}

// `#[max_len]` needs a literal; keep it equal to the configurable upper bound.
const _: () = assert!(MAX_ROOTS_CAPACITY == 16);

/// Bounded set of committed roots, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct RootRegistry {
    pub epoch: EpochState,
    pub max_roots_size: u8,
    #[max_len(16)] // MAX_ROOTS_CAPACITY
    pub roots: Vec<MerkleRoot>,
}

/// Outcome of an accepted `submit_root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootRotation {
    pub previous: EpochState,
    pub evicted: Option<MerkleRoot>,
}

impl RootRegistry {
    pub fn new(epoch_delay: u32, max_roots_size: u8, now: i64) -> Result<Self> {
        Self::validate_max_roots_size(max_roots_size)?;

        Ok(Self {
            epoch: EpochState {
                prev_epoch: 0,
                curr_epoch: now,
                message_collect_end_time: 0,
                next_voting_time: now.saturating_add(epoch_delay as i64),
                epoch_delay,
            },
            max_roots_size,
            roots: Vec::with_capacity(max_roots_size as usize),
        })
    }

    pub fn validate_max_roots_size(max_roots_size: u8) -> Result<()> {
        require!(
            (1..=MAX_ROOTS_CAPACITY).contains(&max_roots_size),
            CrossChainLayerError::InvalidMaxRootsSize
        );
        Ok(())
    }

    /// Commits `root` and rotates the epoch.
    ///
    /// Rejections leave the registry untouched.
    pub fn submit_root(
        &mut self,
        root: [u8; 32],
        valid_timestamp: i64,
        message_collect_end_time: i64,
        now: i64,
    ) -> Result<RootRotation> {
        require!(
            message_collect_end_time >= self.epoch.message_collect_end_time,
            CrossChainLayerError::MessageCollectEndTimeLow
        );
        require!(
            now > self.epoch.curr_epoch,
            CrossChainLayerError::EpochNotAdvanced
        );
        let next_voting_time = now
            .checked_add(self.epoch.epoch_delay as i64)
            .ok_or(CrossChainLayerError::ArithmeticOverflow)?;

        let previous = self.epoch;
        self.epoch = EpochState {
            prev_epoch: previous.curr_epoch,
            curr_epoch: now,
            message_collect_end_time,
            next_voting_time,
            epoch_delay: previous.epoch_delay,
        };

        // A re-submitted root moves to the back with its new timestamp.
        self.roots.retain(|held| held.root != root);
        self.roots.push(MerkleRoot {
            root,
            valid_timestamp,
        });

        Ok(RootRotation {
            previous,
            evicted: self.evict_overflow().pop(),
        })
    }

    pub fn set_max_roots_size(&mut self, max_roots_size: u8) -> Result<Vec<MerkleRoot>> {
        Self::validate_max_roots_size(max_roots_size)?;
        self.max_roots_size = max_roots_size;
        Ok(self.evict_overflow())
    }

    pub fn set_epoch_delay(&mut self, epoch_delay: u32) {
        self.epoch.epoch_delay = epoch_delay;
    }

    pub fn get(&self, root: &[u8; 32]) -> Option<&MerkleRoot> {
        self.roots.iter().find(|held| held.root == *root)
    }

    pub fn is_root_valid(&self, root: &[u8; 32], now: i64) -> bool {
        self.check_root(root, now).is_ok()
    }

    /// Distinguishes a root that was never committed (or already evicted)
    /// from one that is committed but not valid yet.
    pub fn check_root(
        &self,
        root: &[u8; 32],
        now: i64,
    ) -> std::result::Result<(), CrossChainLayerError> {
        match self.get(root) {
            None => Err(CrossChainLayerError::InvalidProof),
            Some(held) if now < held.valid_timestamp => Err(CrossChainLayerError::VotingNotActive),
            Some(_) => Ok(()),
        }
    }

    /// Drops roots with the oldest `valid_timestamp` until the set fits.
    /// Ties go to the earliest inserted.
    fn evict_overflow(&mut self) -> Vec<MerkleRoot> {
        let mut evicted = Vec::new();
        while self.roots.len() > self.max_roots_size as usize {
            let oldest = self
                .roots
                .iter()
                .enumerate()
                .min_by_key(|(_, held)| held.valid_timestamp)
                .map(|(index, _)| index);

            match oldest {
                Some(index) => evicted.push(self.roots.remove(index)),
                None => break,
            }
        }
        evicted
    }
}

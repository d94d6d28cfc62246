use anchor_lang::{prelude::*, solana_program::keccak};

/// Domain separator prepended to a message encoding before hashing it into a leaf.
pub const LEAF_PREFIX: u8 = 0x00;

/// A single destination-bound unit of value and payload.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct MsgEntry {
    /// Origin-side operation identifier (u256, big-endian).
    pub operation_id: [u8; 32],
    /// Account that receives `value` and `body`.
    pub destination: Pubkey,
    /// Lamports forwarded to `destination`.
    pub value: u64,
    /// Opaque payload handed to the destination.
    pub body: Vec<u8>,
    /// Position of this entry in the origin-side payload sequence.
    pub payload_number: u32,
    /// When set, `value` is released from the locked balance instead of the
    /// executor's attached value.
    pub needs_value_unlock: bool,
}

impl MsgEntry {
    pub fn space(&self) -> usize {
        32 + 32 + 8 + (4 + self.body.len()) + 4 + 1
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.operation_id);
        buf.extend_from_slice(self.destination.as_ref());
        buf.extend_from_slice(&self.value.to_be_bytes());
        buf.extend_from_slice(&self.payload_number.to_be_bytes());
        buf.push(self.needs_value_unlock as u8);
        buf.extend_from_slice(&(self.body.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.body);
    }
}

/// The unit committed as one Merkle leaf. Bundles one or more entries so they
/// share a single proof.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Message {
    pub entries: Vec<MsgEntry>,
    /// Executors allowed to prove this message. Empty means anyone.
    pub valid_executors: Vec<Pubkey>,
    /// Mint the executor fee is paid in, or `None` for lamports.
    pub executor_fee_token: Option<Pubkey>,
    pub executor_fee_value: u64,
}

impl Message {
    /// Borsh size of the message as stored on-chain.
    pub fn space(&self) -> usize {
        4 + self.entries.iter().map(MsgEntry::space).sum::<usize>()
            + 4
            + 32 * self.valid_executors.len()
            + 1
            + self.executor_fee_token.map_or(0, |_| 32)
            + 8
    }

    pub fn is_valid_executor(&self, executor: &Pubkey) -> bool {
        self.valid_executors.is_empty() || self.valid_executors.contains(executor)
    }

    /// Byte-stable encoding. Entries keep their order; the executor set is
    /// sorted and deduplicated so its listing order does not matter.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.space());

        buf.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for entry in &self.entries {
            entry.encode_into(&mut buf);
        }

        let mut executors = self.valid_executors.clone();
        executors.sort();
        executors.dedup();
        buf.extend_from_slice(&(executors.len() as u32).to_be_bytes());
        for executor in &executors {
            buf.extend_from_slice(executor.as_ref());
        }

        match &self.executor_fee_token {
            Some(token) => {
                buf.push(1);
                buf.extend_from_slice(token.as_ref());
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&self.executor_fee_value.to_be_bytes());

        buf
    }

    pub fn leaf_hash(&self) -> [u8; 32] {
        keccak::hashv(&[&[LEAF_PREFIX], &self.encode()]).0
    }
}

use anchor_lang::prelude::*;

#[constant]
pub const CROSS_CHAIN_LAYER_SEED: &[u8] = b"cross_chain_layer";

#[constant]
pub const VAULT_SEED: &[u8] = b"vault";

/// Mint authority for executor fee tokens.
#[constant]
pub const AUTHORITY_SEED: &[u8] = b"authority";

/// Upper bound for `max_roots_size`. Also the reserved length of the root list.
pub const MAX_ROOTS_CAPACITY: u8 = 16;

mod private {
    #[cfg(feature = "devnet")]
    pub mod config {
        pub const MIN_EPOCH_DELAY: u32 = 60;
    }

    #[cfg(feature = "mainnet")]
    pub mod config {
        pub const MIN_EPOCH_DELAY: u32 = 600;
    }

    #[cfg(not(any(feature = "devnet", feature = "mainnet")))]
    pub mod config {
        pub const MIN_EPOCH_DELAY: u32 = 0;
    }
}

pub use private::config::*;

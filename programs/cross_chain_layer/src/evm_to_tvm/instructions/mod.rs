pub mod update_merkle_root;
pub use update_merkle_root::*;

pub mod prove_message;
pub use prove_message::*;

pub mod dispatch_message;
pub use dispatch_message::*;

pub mod initialize;
pub use initialize::*;

pub mod config;
pub use config::*;

pub mod sequencer;
pub use sequencer::*;

pub mod protocol_fee;
pub use protocol_fee::*;

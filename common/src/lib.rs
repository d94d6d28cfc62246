pub mod error;
pub mod fee;
pub mod merkle;
pub mod message;

pub use error::*;
pub use fee::*;
pub use merkle::*;
pub use message::*;

pub mod constants;
pub mod instructions;
pub mod internal;
pub mod state;

pub use constants::*;
pub use instructions::*;
pub use internal::*;
pub use state::*;

mod internal;

pub mod instructions;

pub use instructions::*;

pub use internal::*;

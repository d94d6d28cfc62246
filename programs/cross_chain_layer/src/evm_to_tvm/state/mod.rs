pub mod executor_guard;
pub use executor_guard::*;

pub mod root_registry;
pub use root_registry::*;

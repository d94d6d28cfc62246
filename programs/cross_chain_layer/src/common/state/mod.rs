pub mod cross_chain_layer;
pub use cross_chain_layer::*;

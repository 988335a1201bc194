mod license;
mod order;
mod token;

pub use license::*;
pub use order::*;
pub use token::*;

/// Activation cap applied when an order doesn't specify one.
pub const DEFAULT_ACTIVATIONS_MAX: u32 = 2;

pub use poet_core::*;
pub use poet_macros::*;

pub use classify::*;
pub use experiment::*;
pub use regress::*;

pub mod classify;
pub mod experiment;
pub mod regress;

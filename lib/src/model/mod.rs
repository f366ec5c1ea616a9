pub mod linalg;
pub mod metrics;
pub mod trainer;
pub mod types;
pub mod utils;

pub use trainer::*;
pub use types::*;
pub use utils::*;

pub mod calculations;
pub mod format;
pub mod input;
pub mod models;

pub use calculations::{BatchSummary, compute_withholding};
pub use input::InputError;
pub use models::*;

//! Command implementations for comfy-cli

pub mod check;
pub mod smoke;

pub use check::check;
pub use smoke::{load_submission, smoke};

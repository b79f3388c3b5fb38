//! Tax calculations for NFS-e service invoices.
//!
//! [`compute_withholding`] is the single entry point for one invoice;
//! [`BatchSummary`] aggregates results across many.

pub mod common;
pub mod summary;
pub mod withholding;

pub use summary::BatchSummary;
pub use withholding::compute_withholding;

//! Menu Computation
//!
//! Pure functions that turn the stored dishes and categories into the
//! customer-facing menu. No database access happens here.

pub mod compute;
pub mod fuzzy;

pub use compute::{CategorySelection, DietaryFilters, MenuQuery, compute_menu};
pub use fuzzy::{FuzzyConfig, FuzzyMatcher};

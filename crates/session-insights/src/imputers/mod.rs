//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median or mean; non-numeric
//! columns are never imputed.

mod statistical;

pub use statistical::NullImputer;

//! Column type normalization.
//!
//! This module provides functionality for:
//! - Converting the month column to an ordered calendar categorical
//! - Coercing the weekend and revenue flags to boolean

mod converters;
mod type_normalizer;

pub use converters::MONTH_LABELS;
pub use type_normalizer::{MONTH_COLUMN, REVENUE_COLUMN, TypeNormalizer, WEEKEND_COLUMN};

//! Aggregation queries over a cleaned session dataset.
//!
//! All queries are read-only. Groups with a missing key are dropped and
//! missing values are skipped; boolean value columns count as 0/1.

mod business;
mod grouping;
mod segments;

pub use business::{
    BOUNCE_RATES_COLUMN, BusinessAnalysis, REGION_COLUMN, TRAFFIC_TYPE_COLUMN,
};
pub use segments::{
    BROWSER_COLUMN, MOBILE_OPERATING_SYSTEMS, OPERATING_SYSTEMS_COLUMN, SegmentAnalysis,
};

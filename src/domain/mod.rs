//! Core domain types and logic.

pub mod report_row;
pub mod table;
pub mod section;
pub mod money;
pub mod normalize;
pub mod gap_fill;
pub mod deals;
pub mod weekly;
pub mod analysis;
pub mod config;
pub mod config_validation;
pub mod error;

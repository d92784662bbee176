//! Core business logic for fxreval.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Revaluation selection, open-item detection and aggregation live here.
//!
//! # Modules
//!
//! - `revaluation` - Open foreign-currency exposure per account, partner and currency
//! - `currency` - Rate conversion and rounding

pub mod currency;
pub mod revaluation;

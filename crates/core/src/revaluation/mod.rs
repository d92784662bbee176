//! Foreign-currency revaluation.
//!
//! This module computes the outstanding multi-currency balances to revalue at
//! a valuation date:
//! - Ledger line selection with an injected row-security predicate
//! - Open-item detection through partial reconciliations
//! - Aggregation per (account, partner, currency)
//! - Keyed result table with a nested account → partner → currency view
//! - Valuation of the result at supplied period-end rates

pub mod aggregate;
pub mod classification;
pub mod error;
pub mod filter;
pub mod reconciliation;
pub mod service;
pub mod table;
pub mod types;
pub mod valuation;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod service_props;

pub use aggregate::Aggregator;
pub use classification::{AccountClassifier, AccountType, ClassifyFn};
pub use error::{RevaluationError, RowFilterError};
pub use filter::{AllowAll, RowFilter, is_eligible, select_candidates};
pub use reconciliation::ReconciliationIndex;
pub use service::RevaluationService;
pub use table::{NestedRevaluations, RevaluationTable};
pub use types::{
    DisplayType, JournalEntryState, LedgerLine, LedgerSnapshot, PartialReconciliation,
    RevaluationKey, RevaluationRequest, RevaluationRow,
};
pub use valuation::RevaluedRow;

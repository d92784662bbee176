//! Revaluation error types.
//!
//! Every variant is fatal for the computation: no partial table is ever
//! returned alongside an error.

use fxreval_shared::types::{AccountId, CurrencyId, LedgerLineId, PartialReconcileId, PartnerId};
use thiserror::Error;

/// Error raised by an external row-security predicate.
pub type RowFilterError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while computing revaluation balances.
#[derive(Debug, Error)]
pub enum RevaluationError {
    /// The row-security predicate failed to evaluate a line.
    #[error("Row security filter failed for ledger line {line_id}: {source}")]
    RowFilter {
        /// Line being evaluated.
        line_id: LedgerLineId,
        /// Underlying predicate error.
        #[source]
        source: RowFilterError,
    },

    /// A partial reconciliation references a line missing from the snapshot.
    #[error(
        "Partial reconciliation {partial_id} references ledger line {line_id} missing from the snapshot"
    )]
    InconsistentSnapshot {
        /// Partial reconciliation ID.
        partial_id: PartialReconcileId,
        /// Missing line ID.
        line_id: LedgerLineId,
    },

    /// An aggregate exceeded the fixed-point range.
    #[error("Amount overflow for account {account_id} in currency {currency_id}")]
    AmountOverflow {
        /// Account being aggregated.
        account_id: AccountId,
        /// Currency being aggregated.
        currency_id: CurrencyId,
    },

    /// The same (account, partner, currency) triple was inserted twice.
    #[error(
        "Duplicate revaluation row for account {account_id}, partner {partner_id:?}, currency {currency_id}"
    )]
    DuplicateKey {
        /// Account ID.
        account_id: AccountId,
        /// Partner ID.
        partner_id: Option<PartnerId>,
        /// Currency ID.
        currency_id: CurrencyId,
    },

    /// No valuation rate was supplied for a currency present in the table.
    #[error("No revaluation rate supplied for currency {currency_id}")]
    MissingRate {
        /// Currency without a rate.
        currency_id: CurrencyId,
    },
}

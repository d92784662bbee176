//! Valuation of revaluation rows at a supplied period-end rate.
//!
//! Rates are inputs here; where they come from is the caller's concern.

use fxreval_shared::types::CurrencyId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::RevaluationError;
use super::table::RevaluationTable;
use super::types::RevaluationRow;
use crate::currency::CurrencyService;

/// A revaluation row with its value at the period-end rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevaluedRow {
    /// The aggregated open amounts.
    #[serde(flatten)]
    pub row: RevaluationRow,
    /// Rate applied (1 foreign unit = rate functional units).
    pub rate: Decimal,
    /// Foreign balance converted at `rate`.
    pub revalued_balance: Decimal,
    /// `revalued_balance - balance`; positive is a gain on a debit position.
    pub adjustment: Decimal,
}

impl RevaluedRow {
    /// Returns true if no adjustment entry is needed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.adjustment.is_zero()
    }
}

impl RevaluationTable {
    /// Values every row at the rate of its currency.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::MissingRate` for a currency without a rate and
    /// `RevaluationError::AmountOverflow` if a conversion leaves the decimal range.
    pub fn revalue<F>(
        &self,
        rates: F,
        decimal_places: u32,
    ) -> Result<Vec<RevaluedRow>, RevaluationError>
    where
        F: Fn(CurrencyId) -> Option<Decimal>,
    {
        self.rows()
            .map(|row| {
                let rate = rates(row.currency_id).ok_or(RevaluationError::MissingRate {
                    currency_id: row.currency_id,
                })?;
                let overflow = || RevaluationError::AmountOverflow {
                    account_id: row.account_id,
                    currency_id: row.currency_id,
                };

                let revalued_balance =
                    CurrencyService::convert_with_precision(row.foreign_balance, rate, decimal_places)
                        .ok_or_else(overflow)?;
                let adjustment = revalued_balance
                    .checked_sub(row.balance)
                    .ok_or_else(overflow)?;

                Ok(RevaluedRow {
                    row: row.clone(),
                    rate,
                    revalued_balance,
                    adjustment,
                })
            })
            .collect()
    }
}

//! Grouping of open lines into revaluation rows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::classification::AccountClassifier;
use super::error::RevaluationError;
use super::types::{LedgerLine, RevaluationKey, RevaluationRow};

/// Running totals of one group.
#[derive(Debug, Clone, Copy, Default)]
struct GroupTotals {
    debit: Decimal,
    credit: Decimal,
    foreign: Decimal,
}

impl GroupTotals {
    fn add(&mut self, line: &LedgerLine) -> Option<()> {
        self.debit = self.debit.checked_add(line.debit)?;
        self.credit = self.credit.checked_add(line.credit)?;
        self.foreign = self.foreign.checked_add(line.amount_currency)?;
        Some(())
    }
}

/// Accumulates open lines per (account, effective partner, currency).
///
/// Groups are kept in key order so `finish` yields rows ordered by account,
/// partner (null first) and currency.
pub struct Aggregator<'c, C: AccountClassifier + ?Sized> {
    classifier: &'c C,
    groups: BTreeMap<RevaluationKey, GroupTotals>,
}

impl<'c, C: AccountClassifier + ?Sized> Aggregator<'c, C> {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new(classifier: &'c C) -> Self {
        Self {
            classifier,
            groups: BTreeMap::new(),
        }
    }

    /// Returns the group key of a line, or `None` for lines without currency.
    #[must_use]
    pub fn key_for(&self, line: &LedgerLine) -> Option<RevaluationKey> {
        let currency_id = line.currency_id?;
        let partner_id = if self.classifier.segments_by_partner(line.account_id) {
            line.partner_id
        } else {
            None
        };

        Some(RevaluationKey {
            account_id: line.account_id,
            partner_id,
            currency_id,
        })
    }

    /// Adds one open line to its group.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::AmountOverflow` if a total leaves the decimal range.
    pub fn add(&mut self, line: &LedgerLine) -> Result<(), RevaluationError> {
        let Some(key) = self.key_for(line) else {
            return Ok(());
        };

        self.groups
            .entry(key)
            .or_default()
            .add(line)
            .ok_or(RevaluationError::AmountOverflow {
                account_id: key.account_id,
                currency_id: key.currency_id,
            })
    }

    /// Number of groups accumulated so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Reduces the groups to rows in key order.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::AmountOverflow` if a balance leaves the decimal range.
    pub fn finish(self) -> Result<Vec<RevaluationRow>, RevaluationError> {
        self.groups
            .into_iter()
            .map(|(key, totals)| {
                let balance = totals.debit.checked_sub(totals.credit).ok_or(
                    RevaluationError::AmountOverflow {
                        account_id: key.account_id,
                        currency_id: key.currency_id,
                    },
                )?;

                Ok(RevaluationRow {
                    account_id: key.account_id,
                    partner_id: key.partner_id,
                    currency_id: key.currency_id,
                    balance,
                    debit: totals.debit,
                    credit: totals.credit,
                    foreign_balance: totals.foreign,
                })
            })
            .collect()
    }
}

//! Open-item detection against partial reconciliations.
//!
//! A line is still open at the valuation date when it is not fully reconciled,
//! or when the latest partial reconciliation closing it involves a counterpart
//! dated on or after the valuation date. Which side closes a line depends on
//! its sign:
//!
//! - net credit line: the debit lines it is partially reconciled with;
//! - net debit line: the credit lines it is partially reconciled with;
//! - zero-balance line: nothing.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use fxreval_shared::types::{LedgerLineId, PartialReconcileId};
use rust_decimal::Decimal;

use super::error::RevaluationError;
use super::types::{LedgerLine, LedgerSnapshot};

/// Latest counterpart dates per line and side, built from one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationIndex {
    /// Debit line -> latest date of the credit lines reconciled against it.
    latest_credit_counterpart: HashMap<LedgerLineId, NaiveDate>,
    /// Credit line -> latest date of the debit lines reconciled against it.
    latest_debit_counterpart: HashMap<LedgerLineId, NaiveDate>,
}

impl ReconciliationIndex {
    /// Indexes the partial reconciliations of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::InconsistentSnapshot` if a partial
    /// reconciliation references a line the snapshot does not contain.
    pub fn build(snapshot: &LedgerSnapshot) -> Result<Self, RevaluationError> {
        let dates: HashMap<LedgerLineId, NaiveDate> = snapshot
            .lines()
            .iter()
            .map(|line| (line.id, line.date))
            .collect();

        let date_of = |partial_id: PartialReconcileId, line_id: LedgerLineId| {
            dates
                .get(&line_id)
                .copied()
                .ok_or(RevaluationError::InconsistentSnapshot {
                    partial_id,
                    line_id,
                })
        };

        let mut index = Self::default();
        for partial in snapshot.partials() {
            let debit_date = date_of(partial.id, partial.debit_line_id)?;
            let credit_date = date_of(partial.id, partial.credit_line_id)?;

            keep_latest(
                &mut index.latest_credit_counterpart,
                partial.debit_line_id,
                credit_date,
            );
            keep_latest(
                &mut index.latest_debit_counterpart,
                partial.credit_line_id,
                debit_date,
            );
        }

        Ok(index)
    }

    /// Returns the latest date of the counterparts that close this line.
    #[must_use]
    pub fn latest_closing_date(&self, line: &LedgerLine) -> Option<NaiveDate> {
        match line.balance().cmp(&Decimal::ZERO) {
            Ordering::Less => self.latest_debit_counterpart.get(&line.id).copied(),
            Ordering::Greater => self.latest_credit_counterpart.get(&line.id).copied(),
            Ordering::Equal => None,
        }
    }

    /// Returns true if the line is still outstanding at the valuation date.
    ///
    /// A counterpart dated exactly on the valuation date keeps the line open.
    #[must_use]
    pub fn is_open(&self, line: &LedgerLine, valuation_date: NaiveDate) -> bool {
        if !line.is_fully_reconciled() {
            return true;
        }

        self.latest_closing_date(line)
            .is_some_and(|closing| closing >= valuation_date)
    }
}

fn keep_latest(map: &mut HashMap<LedgerLineId, NaiveDate>, line_id: LedgerLineId, date: NaiveDate) {
    map.entry(line_id)
        .and_modify(|latest| *latest = (*latest).max(date))
        .or_insert(date);
}

//! Revaluation service.
//!
//! Runs the pipeline over one ledger snapshot:
//! select candidates, drop closed items, aggregate, assemble.

use tracing::{debug, info, info_span};

use super::aggregate::Aggregator;
use super::classification::AccountClassifier;
use super::error::RevaluationError;
use super::filter::{RowFilter, select_candidates};
use super::reconciliation::ReconciliationIndex;
use super::table::RevaluationTable;
use super::types::{LedgerSnapshot, RevaluationRequest};

/// Revaluation service for computing open foreign-currency exposure.
///
/// Pure business logic. The snapshot, row-security predicate and account
/// classification are all supplied by the caller.
pub struct RevaluationService;

impl RevaluationService {
    /// Computes the revaluation table of a request.
    ///
    /// # Arguments
    ///
    /// * `request` - Accounts, companies and valuation date
    /// * `snapshot` - Point-in-time lines and partial reconciliations
    /// * `row_filter` - Row-security predicate
    /// * `classifier` - Account type lookup used for partner segmentation
    ///
    /// # Errors
    ///
    /// Returns an error if the row filter fails, the snapshot is missing a
    /// reconciliation counterpart, or an aggregate overflows. No partial
    /// table is returned.
    pub fn compute<R, C>(
        request: &RevaluationRequest,
        snapshot: &LedgerSnapshot,
        row_filter: &R,
        classifier: &C,
    ) -> Result<RevaluationTable, RevaluationError>
    where
        R: RowFilter + ?Sized,
        C: AccountClassifier + ?Sized,
    {
        let span = info_span!(
            "revaluation",
            valuation_date = %request.valuation_date,
            accounts = request.account_ids.len(),
            companies = request.company_ids.len(),
        );
        let _guard = span.enter();

        if request.account_ids.is_empty() {
            debug!("no accounts requested");
            return Ok(RevaluationTable::new());
        }

        let candidates = select_candidates(snapshot.lines(), request, row_filter)?;
        debug!(
            lines = snapshot.lines().len(),
            candidates = candidates.len(),
            "selected candidate lines"
        );

        let index = ReconciliationIndex::build(snapshot)?;

        let mut aggregator = Aggregator::new(classifier);
        let mut open = 0usize;
        for line in candidates
            .into_iter()
            .filter(|line| index.is_open(line, request.valuation_date))
        {
            aggregator.add(line)?;
            open += 1;
        }
        debug!(open, groups = aggregator.group_count(), "aggregated open lines");

        let table = RevaluationTable::from_rows(aggregator.finish()?)?;
        info!(rows = table.len(), "revaluation table computed");

        Ok(table)
    }
}

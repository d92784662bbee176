//! Ledger line selection.
//!
//! Structural eligibility (company, display type, entry state, account, date,
//! currency) is checked first; the injected row-security predicate only sees
//! lines that are otherwise eligible.

use super::error::{RevaluationError, RowFilterError};
use super::types::{JournalEntryState, LedgerLine, RevaluationRequest};

/// Row-security capability supplied by the host.
///
/// Implemented for any `Fn(&LedgerLine) -> Result<bool, RowFilterError>`.
pub trait RowFilter {
    /// Returns whether the caller may see the line.
    fn accepts(&self, line: &LedgerLine) -> Result<bool, RowFilterError>;
}

impl<F> RowFilter for F
where
    F: Fn(&LedgerLine) -> Result<bool, RowFilterError>,
{
    fn accepts(&self, line: &LedgerLine) -> Result<bool, RowFilterError> {
        self(line)
    }
}

/// Row filter that accepts every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RowFilter for AllowAll {
    fn accepts(&self, _line: &LedgerLine) -> Result<bool, RowFilterError> {
        Ok(true)
    }
}

/// Returns true if the line passes every structural condition of the request.
#[must_use]
pub fn is_eligible(line: &LedgerLine, request: &RevaluationRequest) -> bool {
    let Some(currency_id) = line.currency_id else {
        return false;
    };

    request.company_ids.contains(&line.company_id)
        && !line.display_type.is_marker()
        && line.entry_state != JournalEntryState::Cancelled
        && request.account_ids.contains(&line.account_id)
        && line.date <= request.valuation_date
        && request.functional_currency != Some(currency_id)
}

/// Selects the candidate lines of a request.
///
/// # Errors
///
/// Returns `RevaluationError::RowFilter` as soon as the predicate fails on any line.
pub fn select_candidates<'a, R>(
    lines: &'a [LedgerLine],
    request: &RevaluationRequest,
    row_filter: &R,
) -> Result<Vec<&'a LedgerLine>, RevaluationError>
where
    R: RowFilter + ?Sized,
{
    let mut candidates = Vec::new();

    for line in lines.iter().filter(|line| is_eligible(line, request)) {
        let accepted = row_filter
            .accepts(line)
            .map_err(|source| RevaluationError::RowFilter {
                line_id: line.id,
                source,
            })?;
        if accepted {
            candidates.push(line);
        }
    }

    Ok(candidates)
}

//! Row-security predicates backed by the company model.

use std::collections::BTreeSet;

use fxreval_core::revaluation::{LedgerLine, RowFilter, RowFilterError};
use fxreval_shared::types::CompanyId;

/// Accepts lines of the companies a caller may read.
///
/// RLS scopes each snapshot read to one requested company; this predicate
/// decides which of the requested companies end up in the table.
#[derive(Debug, Clone, Default)]
pub struct CompanyRowFilter {
    allowed: BTreeSet<CompanyId>,
}

impl CompanyRowFilter {
    /// Creates a filter allowing the given companies.
    #[must_use]
    pub fn new(allowed: impl IntoIterator<Item = CompanyId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Returns the allowed companies.
    #[must_use]
    pub fn allowed(&self) -> &BTreeSet<CompanyId> {
        &self.allowed
    }
}

impl RowFilter for CompanyRowFilter {
    fn accepts(&self, line: &LedgerLine) -> Result<bool, RowFilterError> {
        if self.allowed.is_empty() {
            return Err("no companies allowed for the current user".into());
        }
        Ok(self.allowed.contains(&line.company_id))
    }
}

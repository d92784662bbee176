//! Revaluation result lookup.
//!
//! Rows are stored under their composite key, which makes the "one row per
//! (account, partner, currency)" invariant structural. The nested
//! account → partner → currency view is derived on demand.

use std::collections::{BTreeMap, BTreeSet};

use fxreval_shared::types::{AccountId, CurrencyId, PartnerId};
use serde::{Serialize, Serializer};

use super::error::RevaluationError;
use super::types::{RevaluationKey, RevaluationRow};

/// Nested view: account → partner (nullable) → currency → row.
pub type NestedRevaluations =
    BTreeMap<AccountId, BTreeMap<Option<PartnerId>, BTreeMap<CurrencyId, RevaluationRow>>>;

/// Result of one revaluation computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevaluationTable {
    rows: BTreeMap<RevaluationKey, RevaluationRow>,
}

impl RevaluationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from rows.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::DuplicateKey` if two rows share a key.
    pub fn from_rows(
        rows: impl IntoIterator<Item = RevaluationRow>,
    ) -> Result<Self, RevaluationError> {
        let mut table = Self::new();
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    /// Inserts a row.
    ///
    /// # Errors
    ///
    /// Returns `RevaluationError::DuplicateKey` if the key is already present.
    pub fn insert(&mut self, row: RevaluationRow) -> Result<(), RevaluationError> {
        let key = row.key();
        if self.rows.contains_key(&key) {
            return Err(RevaluationError::DuplicateKey {
                account_id: key.account_id,
                partner_id: key.partner_id,
                currency_id: key.currency_id,
            });
        }
        self.rows.insert(key, row);
        Ok(())
    }

    /// Looks up the row of one (account, partner, currency) triple.
    #[must_use]
    pub fn get(
        &self,
        account_id: AccountId,
        partner_id: Option<PartnerId>,
        currency_id: CurrencyId,
    ) -> Option<&RevaluationRow> {
        self.rows.get(&RevaluationKey {
            account_id,
            partner_id,
            currency_id,
        })
    }

    /// Iterates rows ordered by account, partner (null first) and currency.
    pub fn rows(&self) -> impl Iterator<Item = &RevaluationRow> {
        self.rows.values()
    }

    /// Returns the accounts that have at least one row.
    #[must_use]
    pub fn accounts(&self) -> BTreeSet<AccountId> {
        self.rows.keys().map(|key| key.account_id).collect()
    }

    /// Returns the partner keys present for an account.
    #[must_use]
    pub fn partners(&self, account_id: AccountId) -> BTreeSet<Option<PartnerId>> {
        self.rows
            .keys()
            .filter(|key| key.account_id == account_id)
            .map(|key| key.partner_id)
            .collect()
    }

    /// Returns the currencies present for an (account, partner) pair.
    #[must_use]
    pub fn currencies(
        &self,
        account_id: AccountId,
        partner_id: Option<PartnerId>,
    ) -> BTreeSet<CurrencyId> {
        self.rows
            .keys()
            .filter(|key| key.account_id == account_id && key.partner_id == partner_id)
            .map(|key| key.currency_id)
            .collect()
    }

    /// Returns the nested account → partner → currency view.
    #[must_use]
    pub fn to_nested(&self) -> NestedRevaluations {
        let mut nested = NestedRevaluations::new();
        for (key, row) in &self.rows {
            nested
                .entry(key.account_id)
                .or_default()
                .entry(key.partner_id)
                .or_default()
                .insert(key.currency_id, row.clone());
        }
        nested
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the table, returning rows in key order.
    #[must_use]
    pub fn into_rows(self) -> Vec<RevaluationRow> {
        self.rows.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a RevaluationTable {
    type Item = &'a RevaluationRow;
    type IntoIter = std::collections::btree_map::Values<'a, RevaluationKey, RevaluationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values()
    }
}

/// Serialized as the ordered list of rows; JSON objects cannot use a null partner as key.
impl Serialize for RevaluationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.values())
    }
}

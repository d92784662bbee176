//! Revaluation domain types.
//!
//! Ledger lines and partial reconciliations are read-only inputs owned by the
//! host ledger. Revaluation rows are produced fresh by every computation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use fxreval_shared::types::{
    AccountId, CompanyId, CurrencyId, FullReconcileId, JournalEntryId, LedgerLineId,
    PartialReconcileId, PartnerId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State of the journal entry owning a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryState {
    /// Entry is still a draft.
    Draft,
    /// Entry has been posted.
    Posted,
    /// Entry has been cancelled and no longer affects balances.
    Cancelled,
}

/// Display type of a ledger line.
///
/// Section and note lines are layout markers on a document and carry no amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    /// Ordinary product/service line.
    Product,
    /// Section heading marker.
    LineSection,
    /// Free-text note marker.
    LineNote,
    /// Payment term (receivable/payable) line.
    PaymentTerm,
    /// Tax line.
    Tax,
    /// Cash rounding line.
    Rounding,
}

impl DisplayType {
    /// Returns true for section and note pseudo-lines.
    #[must_use]
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::LineSection | Self::LineNote)
    }
}

/// A posted accounting movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Line ID.
    pub id: LedgerLineId,
    /// Owning journal entry.
    pub journal_entry_id: JournalEntryId,
    /// State of the owning journal entry.
    pub entry_state: JournalEntryState,
    /// Company of the owning journal entry.
    pub company_id: CompanyId,
    /// Account the line is posted to.
    pub account_id: AccountId,
    /// Partner, if any.
    pub partner_id: Option<PartnerId>,
    /// Currency the line is denominated in. Null for functional-currency-only lines.
    pub currency_id: Option<CurrencyId>,
    /// Debit in functional currency.
    pub debit: Decimal,
    /// Credit in functional currency.
    pub credit: Decimal,
    /// Signed amount in the line's currency.
    pub amount_currency: Decimal,
    /// Posting date.
    pub date: NaiveDate,
    /// Full reconciliation group, once completely settled.
    pub full_reconcile_id: Option<FullReconcileId>,
    /// Display type tag.
    pub display_type: DisplayType,
}

impl LedgerLine {
    /// Returns debit minus credit.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the line belongs to a full reconciliation.
    #[must_use]
    pub const fn is_fully_reconciled(&self) -> bool {
        self.full_reconcile_id.is_some()
    }
}

/// A pairing of one debit line and one credit line offsetting part of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialReconciliation {
    /// Partial reconciliation ID.
    pub id: PartialReconcileId,
    /// The debit side.
    pub debit_line_id: LedgerLineId,
    /// The credit side.
    pub credit_line_id: LedgerLineId,
}

/// Point-in-time view of the ledger a computation runs against.
///
/// Holds every line readable for the request (candidates and their
/// reconciliation counterparts) and the partial reconciliations touching them.
/// Callers must read both from the same transaction.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    lines: Vec<LedgerLine>,
    partials: Vec<PartialReconciliation>,
}

impl LedgerSnapshot {
    /// Creates a snapshot from lines and partial reconciliations.
    #[must_use]
    pub const fn new(lines: Vec<LedgerLine>, partials: Vec<PartialReconciliation>) -> Self {
        Self { lines, partials }
    }

    /// Returns all lines in the snapshot.
    #[must_use]
    pub fn lines(&self) -> &[LedgerLine] {
        &self.lines
    }

    /// Returns all partial reconciliations in the snapshot.
    #[must_use]
    pub fn partials(&self) -> &[PartialReconciliation] {
        &self.partials
    }
}

/// Parameters of one revaluation computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevaluationRequest {
    /// Accounts to revalue.
    pub account_ids: BTreeSet<AccountId>,
    /// Date the exposure is measured at.
    pub valuation_date: NaiveDate,
    /// Companies whose entries are considered.
    pub company_ids: BTreeSet<CompanyId>,
    /// Functional currency; lines denominated in it are never exposures.
    pub functional_currency: Option<CurrencyId>,
}

impl RevaluationRequest {
    /// Creates an empty request for the given valuation date.
    #[must_use]
    pub const fn new(valuation_date: NaiveDate) -> Self {
        Self {
            account_ids: BTreeSet::new(),
            valuation_date,
            company_ids: BTreeSet::new(),
            functional_currency: None,
        }
    }

    /// Adds accounts to revalue.
    #[must_use]
    pub fn with_accounts(mut self, account_ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.account_ids.extend(account_ids);
        self
    }

    /// Adds companies to consider.
    #[must_use]
    pub fn with_companies(mut self, company_ids: impl IntoIterator<Item = CompanyId>) -> Self {
        self.company_ids.extend(company_ids);
        self
    }

    /// Sets the functional currency.
    #[must_use]
    pub fn with_functional_currency(mut self, currency_id: CurrencyId) -> Self {
        self.functional_currency = Some(currency_id);
        self
    }
}

/// Composite key of a revaluation row.
///
/// Field order defines the output order: account, then partner (null first),
/// then currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevaluationKey {
    /// Account ID.
    pub account_id: AccountId,
    /// Partner ID, null when the account is not segmented by partner.
    pub partner_id: Option<PartnerId>,
    /// Foreign currency ID.
    pub currency_id: CurrencyId,
}

/// Aggregated open amounts for one (account, partner, currency) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevaluationRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Partner ID, null when the account is not segmented by partner.
    pub partner_id: Option<PartnerId>,
    /// Foreign currency ID.
    pub currency_id: CurrencyId,
    /// Functional-currency balance (debit - credit).
    pub balance: Decimal,
    /// Total debit in functional currency.
    pub debit: Decimal,
    /// Total credit in functional currency.
    pub credit: Decimal,
    /// Balance in the foreign currency.
    pub foreign_balance: Decimal,
}

impl RevaluationRow {
    /// Returns the row's composite key.
    #[must_use]
    pub const fn key(&self) -> RevaluationKey {
        RevaluationKey {
            account_id: self.account_id,
            partner_id: self.partner_id,
            currency_id: self.currency_id,
        }
    }
}

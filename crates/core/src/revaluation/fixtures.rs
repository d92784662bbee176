//! Test fixtures for building ledger snapshots.

use chrono::NaiveDate;
use fxreval_shared::types::{
    AccountId, CompanyId, CurrencyId, FullReconcileId, JournalEntryId, LedgerLineId,
    PartialReconcileId, PartnerId,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{DisplayType, JournalEntryState, LedgerLine, PartialReconciliation};

/// Deterministic typed ID from a small number.
pub(crate) fn id<T: From<Uuid>>(n: u128) -> T {
    T::from(Uuid::from_u128(n))
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn partial(n: u128, debit_line: u128, credit_line: u128) -> PartialReconciliation {
    PartialReconciliation {
        id: id::<PartialReconcileId>(n),
        debit_line_id: id::<LedgerLineId>(debit_line),
        credit_line_id: id::<LedgerLineId>(credit_line),
    }
}

/// Builder for ledger lines with posted, company-1 defaults.
#[derive(Debug, Clone)]
pub(crate) struct LineBuilder(LedgerLine);

impl LineBuilder {
    fn new(n: u128, account_id: AccountId, debit: Decimal, credit: Decimal) -> Self {
        Self(LedgerLine {
            id: id::<LedgerLineId>(n),
            journal_entry_id: id::<JournalEntryId>(n),
            entry_state: JournalEntryState::Posted,
            company_id: id::<CompanyId>(1),
            account_id,
            partner_id: None,
            currency_id: None,
            debit,
            credit,
            amount_currency: debit - credit,
            date: date(2024, 1, 1),
            full_reconcile_id: None,
            display_type: DisplayType::Product,
        })
    }

    pub(crate) fn debit(n: u128, account_id: AccountId, amount: Decimal) -> Self {
        Self::new(n, account_id, amount, Decimal::ZERO)
    }

    pub(crate) fn credit(n: u128, account_id: AccountId, amount: Decimal) -> Self {
        Self::new(n, account_id, Decimal::ZERO, amount)
    }

    pub(crate) fn line_id(mut self, n: u128) -> Self {
        self.0.id = id(n);
        self
    }

    pub(crate) fn account(mut self, account_id: AccountId) -> Self {
        self.0.account_id = account_id;
        self
    }

    pub(crate) fn company(mut self, company_id: CompanyId) -> Self {
        self.0.company_id = company_id;
        self
    }

    pub(crate) fn partner(mut self, partner_id: PartnerId) -> Self {
        self.0.partner_id = Some(partner_id);
        self
    }

    pub(crate) fn currency(mut self, currency_id: CurrencyId) -> Self {
        self.0.currency_id = Some(currency_id);
        self
    }

    pub(crate) fn no_currency(mut self) -> Self {
        self.0.currency_id = None;
        self
    }

    pub(crate) fn foreign(mut self, amount_currency: Decimal) -> Self {
        self.0.amount_currency = amount_currency;
        self
    }

    pub(crate) fn dated(mut self, date: NaiveDate) -> Self {
        self.0.date = date;
        self
    }

    pub(crate) fn reconciled(mut self, n: u128) -> Self {
        self.0.full_reconcile_id = Some(id::<FullReconcileId>(n));
        self
    }

    pub(crate) fn state(mut self, state: JournalEntryState) -> Self {
        self.0.entry_state = state;
        self
    }

    pub(crate) fn display(mut self, display_type: DisplayType) -> Self {
        self.0.display_type = display_type;
        self
    }

    pub(crate) fn build(self) -> LedgerLine {
        self.0
    }
}

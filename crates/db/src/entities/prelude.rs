//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::ledger_lines::Entity as LedgerLines;
pub use super::partial_reconciliations::Entity as PartialReconciliations;

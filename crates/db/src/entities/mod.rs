//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod journal_entries;
pub mod ledger_lines;
pub mod partial_reconciliations;
pub mod sea_orm_active_enums;

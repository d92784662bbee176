//! `SeaORM` active enums mirroring the `PostgreSQL` enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type (`account_type` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Trade receivable.
    #[sea_orm(string_value = "asset_receivable")]
    AssetReceivable,
    /// Trade payable.
    #[sea_orm(string_value = "liability_payable")]
    LiabilityPayable,
    /// Bank and cash.
    #[sea_orm(string_value = "asset_cash")]
    AssetCash,
    /// Credit card liability.
    #[sea_orm(string_value = "liability_credit_card")]
    LiabilityCreditCard,
    /// Any other account.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Journal entry state (`journal_entry_state` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_state")]
pub enum JournalEntryState {
    /// Draft.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Ledger line display type (`line_display_type` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "line_display_type")]
pub enum LineDisplayType {
    /// Product line.
    #[sea_orm(string_value = "product")]
    Product,
    /// Section marker.
    #[sea_orm(string_value = "line_section")]
    LineSection,
    /// Note marker.
    #[sea_orm(string_value = "line_note")]
    LineNote,
    /// Payment term line.
    #[sea_orm(string_value = "payment_term")]
    PaymentTerm,
    /// Tax line.
    #[sea_orm(string_value = "tax")]
    Tax,
    /// Rounding line.
    #[sea_orm(string_value = "rounding")]
    Rounding,
}

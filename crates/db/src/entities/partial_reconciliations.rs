//! `SeaORM` Entity for partial_reconciliations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "partial_reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub debit_line_id: Uuid,
    pub credit_line_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_lines::Entity",
        from = "Column::DebitLineId",
        to = "super::ledger_lines::Column::Id"
    )]
    DebitLine,
    #[sea_orm(
        belongs_to = "super::ledger_lines::Entity",
        from = "Column::CreditLineId",
        to = "super::ledger_lines::Column::Id"
    )]
    CreditLine,
}

impl ActiveModelBehavior for ActiveModel {}

//! Row-Level Security (RLS) context management.
//!
//! Every revaluation read runs inside a transaction scoped to one company
//! through `PostgreSQL` RLS.
//!
//! # Usage
//!
//! ```ignore
//! use fxreval_db::rls::RlsConnection;
//!
//! let rls = RlsConnection::new(&db, company_id).await?;
//! let lines = LedgerLines::find().all(rls.transaction()).await?;
//! rls.rollback().await?;
//! ```

use fxreval_shared::types::CompanyId;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel,
    TransactionTrait,
};

/// A database transaction with the company RLS context set.
///
/// The `app.current_company_id` setting is applied with `SET LOCAL`, so it is
/// dropped together with the transaction.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction and sets the company RLS context.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the RLS
    /// context cannot be set.
    pub async fn new(db: &DatabaseConnection, company_id: CompanyId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_rls_context(&txn, company_id).await?;
        Ok(Self { txn })
    }

    /// Begins a read-only `REPEATABLE READ` transaction and sets the company
    /// RLS context.
    ///
    /// Every query issued through it sees the same snapshot of the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the RLS
    /// context cannot be set.
    pub async fn snapshot(db: &DatabaseConnection, company_id: CompanyId) -> Result<Self, DbErr> {
        let txn = db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await?;
        set_rls_context(&txn, company_id).await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Extension trait for `DatabaseConnection` to create RLS-scoped transactions.
#[async_trait::async_trait]
pub trait RlsExt {
    /// Creates an RLS-scoped transaction for the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the RLS connection cannot be created.
    async fn with_rls(&self, company_id: CompanyId) -> Result<RlsConnection, DbErr>;
}

#[async_trait::async_trait]
impl RlsExt for DatabaseConnection {
    async fn with_rls(&self, company_id: CompanyId) -> Result<RlsConnection, DbErr> {
        RlsConnection::new(self, company_id).await
    }
}

/// Sets the company RLS context on an existing transaction.
///
/// # Errors
///
/// Returns an error if the RLS context cannot be set.
pub async fn set_rls_context(txn: &DatabaseTransaction, company_id: CompanyId) -> Result<(), DbErr> {
    txn.execute_unprepared(&rls_context_sql(company_id)).await?;
    Ok(())
}

/// Bounds every statement of an existing transaction.
///
/// # Errors
///
/// Returns an error if the timeout cannot be set.
pub async fn set_statement_timeout(txn: &DatabaseTransaction, seconds: u64) -> Result<(), DbErr> {
    txn.execute_unprepared(&statement_timeout_sql(seconds)).await?;
    Ok(())
}

// Typed IDs render as canonical UUIDs, so inlining them cannot inject SQL.
fn rls_context_sql(company_id: CompanyId) -> String {
    format!("SET LOCAL app.current_company_id = '{company_id}'")
}

fn statement_timeout_sql(seconds: u64) -> String {
    format!("SET LOCAL statement_timeout = '{seconds}s'")
}

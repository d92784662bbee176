//! Revaluation repository.
//!
//! Loads a point-in-time ledger snapshot inside one RLS-scoped, read-only
//! `REPEATABLE READ` transaction and hands it to `RevaluationService`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use fxreval_core::revaluation::{
    AccountType, DisplayType, JournalEntryState, LedgerLine, LedgerSnapshot,
    PartialReconciliation, RevaluationError, RevaluationRequest, RevaluationService,
    RevaluationTable, RowFilter,
};
use fxreval_shared::AppError;
use fxreval_shared::types::{
    AccountId, CompanyId, CurrencyId, FullReconcileId, JournalEntryId, LedgerLineId,
    PartialReconcileId, PartnerId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entries, ledger_lines, partial_reconciliations, sea_orm_active_enums,
};
use crate::rls::{RlsConnection, set_rls_context, set_statement_timeout};

/// Most IDs bound into one `IN` list. `PostgreSQL` caps a statement at 65535
/// parameters and the partial lookup binds each chunk twice.
const MAX_IDS_PER_QUERY: usize = 10_000;

/// Error types for revaluation snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A ledger line references a journal entry the snapshot cannot see.
    #[error("Ledger line {line_id} references missing journal entry {journal_entry_id}")]
    MissingJournalEntry {
        /// Line ID.
        line_id: Uuid,
        /// Referenced journal entry ID.
        journal_entry_id: Uuid,
    },

    /// The revaluation computation failed.
    #[error("Revaluation failed: {0}")]
    Revaluation(#[from] RevaluationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Revaluation(e) => Self::Computation(e.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning company.
    pub company_id: CompanyId,
    /// Account code, unique per company.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Revaluation flag; defaults from the account type when `None`.
    pub currency_revaluation: Option<bool>,
}

/// Repository reading revaluation inputs from the ledger store.
#[derive(Debug, Clone)]
pub struct RevaluationRepository {
    db: DatabaseConnection,
    statement_timeout_secs: u64,
}

impl RevaluationRepository {
    /// Default statement timeout for snapshot reads.
    pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new revaluation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            statement_timeout_secs: Self::DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }

    /// Sets the statement timeout applied to snapshot reads.
    #[must_use]
    pub const fn with_statement_timeout(mut self, seconds: u64) -> Self {
        self.statement_timeout_secs = seconds;
        self
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, SnapshotError> {
        let rls = RlsConnection::new(&self.db, input.company_id).await?;

        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(input.company_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(account_type_to_model(input.account_type)),
            currency_revaluation: Set(input
                .currency_revaluation
                .unwrap_or_else(|| input.account_type.revaluation_enabled_by_default())),
            created_at: Set(chrono::Utc::now().into()),
        };

        let account = account.insert(rls.transaction()).await?;
        rls.commit().await?;
        Ok(account)
    }

    /// Returns the accounts of a company flagged for currency revaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn revaluation_account_ids(
        &self,
        company_id: CompanyId,
    ) -> Result<BTreeSet<AccountId>, SnapshotError> {
        let rls = RlsConnection::snapshot(&self.db, company_id).await?;

        let ids = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .filter(accounts::Column::CurrencyRevaluation.eq(true))
            .order_by_asc(accounts::Column::Id)
            .all(rls.transaction())
            .await?
            .into_iter()
            .map(|account| AccountId::from_uuid(account.id))
            .collect();

        rls.rollback().await?;
        Ok(ids)
    }

    /// Loads the account type of each requested account.
    ///
    /// Accounts the connection cannot see are left out and classify as unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn load_classification<C: ConnectionTrait>(
        conn: &C,
        account_ids: &BTreeSet<AccountId>,
    ) -> Result<HashMap<AccountId, AccountType>, SnapshotError> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(uuids(account_ids.iter().copied())))
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|account| {
                (
                    AccountId::from_uuid(account.id),
                    account_type_from_model(account.account_type),
                )
            })
            .collect())
    }

    /// Loads the ledger snapshot of a request.
    ///
    /// Structural filters are pushed down to the query; the core re-checks
    /// them. Counterpart lines of partial reconciliations are loaded even when
    /// they are not candidates themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a line's journal entry is missing.
    pub async fn load_snapshot<C: ConnectionTrait>(
        conn: &C,
        request: &RevaluationRequest,
    ) -> Result<LedgerSnapshot, SnapshotError> {
        if request.account_ids.is_empty() || request.company_ids.is_empty() {
            return Ok(LedgerSnapshot::default());
        }

        let mut query = ledger_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(ledger_lines::Column::CompanyId.is_in(uuids(request.company_ids.iter().copied())))
            .filter(ledger_lines::Column::AccountId.is_in(uuids(request.account_ids.iter().copied())))
            .filter(ledger_lines::Column::Date.lte(request.valuation_date))
            .filter(ledger_lines::Column::CurrencyId.is_not_null())
            .filter(ledger_lines::Column::DisplayType.is_not_in([
                sea_orm_active_enums::LineDisplayType::LineSection,
                sea_orm_active_enums::LineDisplayType::LineNote,
            ]))
            .filter(journal_entries::Column::State.ne(sea_orm_active_enums::JournalEntryState::Cancelled));
        if let Some(functional) = request.functional_currency {
            query = query.filter(ledger_lines::Column::CurrencyId.ne(functional.into_inner()));
        }

        let mut lines = query
            .order_by_asc(ledger_lines::Column::Id)
            .all(conn)
            .await?
            .into_iter()
            .map(|(line, entry)| line_from_model(line, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let loaded_ids: Vec<Uuid> = lines.iter().map(|line| line.id.into_inner()).collect();
        let loaded: HashSet<Uuid> = loaded_ids.iter().copied().collect();

        let mut found = BTreeMap::new();
        for chunk in loaded_ids.chunks(MAX_IDS_PER_QUERY) {
            let partials = partial_reconciliations::Entity::find()
                .filter(
                    Condition::any()
                        .add(partial_reconciliations::Column::DebitLineId.is_in(chunk.iter().copied()))
                        .add(partial_reconciliations::Column::CreditLineId.is_in(chunk.iter().copied())),
                )
                .all(conn)
                .await?;
            found.extend(partials.into_iter().map(|partial| (partial.id, partial)));
        }
        let partials: Vec<partial_reconciliations::Model> = found.into_values().collect();

        let counterpart_ids = missing_counterparts(&partials, &loaded);
        for chunk in counterpart_ids.chunks(MAX_IDS_PER_QUERY) {
            let counterparts = ledger_lines::Entity::find()
                .find_also_related(journal_entries::Entity)
                .filter(ledger_lines::Column::Id.is_in(chunk.iter().copied()))
                .order_by_asc(ledger_lines::Column::Id)
                .all(conn)
                .await?;
            for (line, entry) in counterparts {
                lines.push(line_from_model(line, entry)?);
            }
        }

        let partials: Vec<PartialReconciliation> =
            partials.into_iter().map(partial_from_model).collect();
        debug!(
            lines = lines.len(),
            partials = partials.len(),
            "loaded ledger snapshot"
        );

        Ok(LedgerSnapshot::new(lines, partials))
    }

    /// Computes the revaluation table of a request.
    ///
    /// The read runs in a single read-only `REPEATABLE READ` transaction with
    /// a statement timeout, and is rolled back once the snapshot is loaded.
    /// Each requested company is loaded under its own RLS context inside that
    /// transaction, so all companies are read from the same snapshot. Which
    /// companies the caller may actually see is decided by `row_filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the computation fails. No partial
    /// table is ever returned.
    #[tracing::instrument(
        skip(self, request, row_filter),
        fields(valuation_date = %request.valuation_date, companies = request.company_ids.len())
    )]
    pub async fn compute_revaluations<R>(
        &self,
        request: &RevaluationRequest,
        row_filter: &R,
    ) -> Result<RevaluationTable, SnapshotError>
    where
        R: RowFilter + ?Sized + Sync,
    {
        let Some(&first) = request.company_ids.first() else {
            debug!("No companies requested");
            return Ok(RevaluationTable::default());
        };

        let rls = RlsConnection::snapshot(&self.db, first).await?;
        let loaded =
            Self::load_companies(rls.transaction(), request, self.statement_timeout_secs).await;
        let rolled_back = rls.rollback().await;

        let (classification, snapshot) = settle(loaded, rolled_back).inspect_err(|e| {
            error!(error = %e, "Failed to load ledger snapshot");
        })?;

        let table = RevaluationService::compute(request, &snapshot, row_filter, &classification)
            .inspect_err(|e| {
                error!(error = %e, "Failed to compute revaluation");
            })?;

        info!(rows = table.len(), "Revaluation computed");
        Ok(table)
    }

    async fn load_companies(
        txn: &DatabaseTransaction,
        request: &RevaluationRequest,
        statement_timeout_secs: u64,
    ) -> Result<(HashMap<AccountId, AccountType>, LedgerSnapshot), SnapshotError> {
        set_statement_timeout(txn, statement_timeout_secs).await?;

        let mut classification = HashMap::new();
        let mut parts = Vec::with_capacity(request.company_ids.len());
        for &company_id in &request.company_ids {
            set_rls_context(txn, company_id).await?;
            classification.extend(Self::load_classification(txn, &request.account_ids).await?);
            parts.push(Self::load_snapshot(txn, request).await?);
        }

        Ok((classification, merge_snapshots(parts)))
    }
}

/// Resolves a load against its rollback, preferring the load error.
fn settle<T>(
    loaded: Result<T, SnapshotError>,
    rolled_back: Result<(), DbErr>,
) -> Result<T, SnapshotError> {
    match (loaded, rolled_back) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(rollback)) => Err(rollback.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(rollback)) => {
            warn!(error = %rollback, "Failed to roll back snapshot transaction");
            Err(e)
        }
    }
}

/// Unions per-company snapshots; lines and partials are keyed by ID.
fn merge_snapshots(parts: impl IntoIterator<Item = LedgerSnapshot>) -> LedgerSnapshot {
    let mut lines = BTreeMap::new();
    let mut partials = BTreeMap::new();
    for part in parts {
        lines.extend(part.lines().iter().map(|line| (line.id, line.clone())));
        partials.extend(part.partials().iter().map(|partial| (partial.id, *partial)));
    }
    LedgerSnapshot::new(lines.into_values().collect(), partials.into_values().collect())
}

fn uuids<T: Into<Uuid>>(ids: impl IntoIterator<Item = T>) -> Vec<Uuid> {
    ids.into_iter().map(Into::into).collect()
}

/// Line IDs referenced by partial reconciliations but not loaded yet, sorted.
fn missing_counterparts(
    partials: &[partial_reconciliations::Model],
    loaded: &HashSet<Uuid>,
) -> Vec<Uuid> {
    let missing: BTreeSet<Uuid> = partials
        .iter()
        .flat_map(|partial| [partial.debit_line_id, partial.credit_line_id])
        .filter(|id| !loaded.contains(id))
        .collect();
    missing.into_iter().collect()
}

// ============================================================
// MODEL -> DOMAIN CONVERSION
// ============================================================

fn line_from_model(
    line: ledger_lines::Model,
    entry: Option<journal_entries::Model>,
) -> Result<LedgerLine, SnapshotError> {
    let entry = entry.ok_or(SnapshotError::MissingJournalEntry {
        line_id: line.id,
        journal_entry_id: line.journal_entry_id,
    })?;

    Ok(LedgerLine {
        id: LedgerLineId::from_uuid(line.id),
        journal_entry_id: JournalEntryId::from_uuid(line.journal_entry_id),
        entry_state: entry_state_from_model(entry.state),
        company_id: CompanyId::from_uuid(line.company_id),
        account_id: AccountId::from_uuid(line.account_id),
        partner_id: line.partner_id.map(PartnerId::from_uuid),
        currency_id: line.currency_id.map(CurrencyId::from_uuid),
        debit: line.debit,
        credit: line.credit,
        amount_currency: line.amount_currency,
        date: line.date,
        full_reconcile_id: line.full_reconcile_id.map(FullReconcileId::from_uuid),
        display_type: display_type_from_model(line.display_type),
    })
}

fn partial_from_model(partial: partial_reconciliations::Model) -> PartialReconciliation {
    PartialReconciliation {
        id: PartialReconcileId::from_uuid(partial.id),
        debit_line_id: LedgerLineId::from_uuid(partial.debit_line_id),
        credit_line_id: LedgerLineId::from_uuid(partial.credit_line_id),
    }
}

const fn entry_state_from_model(state: sea_orm_active_enums::JournalEntryState) -> JournalEntryState {
    match state {
        sea_orm_active_enums::JournalEntryState::Draft => JournalEntryState::Draft,
        sea_orm_active_enums::JournalEntryState::Posted => JournalEntryState::Posted,
        sea_orm_active_enums::JournalEntryState::Cancelled => JournalEntryState::Cancelled,
    }
}

const fn display_type_from_model(display: sea_orm_active_enums::LineDisplayType) -> DisplayType {
    match display {
        sea_orm_active_enums::LineDisplayType::Product => DisplayType::Product,
        sea_orm_active_enums::LineDisplayType::LineSection => DisplayType::LineSection,
        sea_orm_active_enums::LineDisplayType::LineNote => DisplayType::LineNote,
        sea_orm_active_enums::LineDisplayType::PaymentTerm => DisplayType::PaymentTerm,
        sea_orm_active_enums::LineDisplayType::Tax => DisplayType::Tax,
        sea_orm_active_enums::LineDisplayType::Rounding => DisplayType::Rounding,
    }
}

const fn account_type_from_model(account_type: sea_orm_active_enums::AccountType) -> AccountType {
    match account_type {
        sea_orm_active_enums::AccountType::AssetReceivable => AccountType::AssetReceivable,
        sea_orm_active_enums::AccountType::LiabilityPayable => AccountType::LiabilityPayable,
        sea_orm_active_enums::AccountType::AssetCash => AccountType::AssetCash,
        sea_orm_active_enums::AccountType::LiabilityCreditCard => AccountType::LiabilityCreditCard,
        sea_orm_active_enums::AccountType::Other => AccountType::Other,
    }
}

const fn account_type_to_model(account_type: AccountType) -> sea_orm_active_enums::AccountType {
    match account_type {
        AccountType::AssetReceivable => sea_orm_active_enums::AccountType::AssetReceivable,
        AccountType::LiabilityPayable => sea_orm_active_enums::AccountType::LiabilityPayable,
        AccountType::AssetCash => sea_orm_active_enums::AccountType::AssetCash,
        AccountType::LiabilityCreditCard => sea_orm_active_enums::AccountType::LiabilityCreditCard,
        AccountType::Other => sea_orm_active_enums::AccountType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(id: Uuid, state: sea_orm_active_enums::JournalEntryState) -> journal_entries::Model {
        journal_entries::Model {
            id,
            company_id: Uuid::from_u128(1),
            state,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reference: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn line(id: u128) -> ledger_lines::Model {
        ledger_lines::Model {
            id: Uuid::from_u128(id),
            company_id: Uuid::from_u128(1),
            journal_entry_id: Uuid::from_u128(100),
            account_id: Uuid::from_u128(2),
            partner_id: Some(Uuid::from_u128(3)),
            currency_id: Some(Uuid::from_u128(4)),
            debit: dec!(100.0000),
            credit: dec!(0),
            amount_currency: dec!(92.5000),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            full_reconcile_id: None,
            display_type: sea_orm_active_enums::LineDisplayType::PaymentTerm,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn partial(id: u128, debit: u128, credit: u128) -> partial_reconciliations::Model {
        partial_reconciliations::Model {
            id: Uuid::from_u128(id),
            company_id: Uuid::from_u128(1),
            debit_line_id: Uuid::from_u128(debit),
            credit_line_id: Uuid::from_u128(credit),
            amount: dec!(10),
            created_at: chrono::Utc::now().into(),
        }
    }

    // ===== Line conversion =====

    #[test]
    fn test_line_from_model() {
        let model = line(7);
        let converted = line_from_model(
            model.clone(),
            Some(entry(model.journal_entry_id, sea_orm_active_enums::JournalEntryState::Posted)),
        )
        .unwrap();

        assert_eq!(converted.id.into_inner(), model.id);
        assert_eq!(converted.journal_entry_id.into_inner(), model.journal_entry_id);
        assert_eq!(converted.entry_state, JournalEntryState::Posted);
        assert_eq!(converted.partner_id.map(PartnerId::into_inner), model.partner_id);
        assert_eq!(converted.currency_id.map(CurrencyId::into_inner), model.currency_id);
        assert_eq!(converted.debit, dec!(100));
        assert_eq!(converted.amount_currency, dec!(92.5));
        assert_eq!(converted.display_type, DisplayType::PaymentTerm);
        assert!(!converted.is_fully_reconciled());
    }

    #[test]
    fn test_line_without_entry_is_rejected() {
        let err = line_from_model(line(7), None).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::MissingJournalEntry { line_id, .. } if line_id == Uuid::from_u128(7)
        ));
    }

    #[test]
    fn test_line_keeps_full_reconcile_id() {
        let mut model = line(7);
        model.full_reconcile_id = Some(Uuid::from_u128(55));
        model.currency_id = None;
        let converted = line_from_model(
            model,
            Some(entry(Uuid::from_u128(100), sea_orm_active_enums::JournalEntryState::Cancelled)),
        )
        .unwrap();

        assert!(converted.is_fully_reconciled());
        assert!(converted.currency_id.is_none());
        assert_eq!(converted.entry_state, JournalEntryState::Cancelled);
    }

    #[test]
    fn test_partial_from_model() {
        let converted = partial_from_model(partial(9, 1, 2));
        assert_eq!(converted.id.into_inner(), Uuid::from_u128(9));
        assert_eq!(converted.debit_line_id.into_inner(), Uuid::from_u128(1));
        assert_eq!(converted.credit_line_id.into_inner(), Uuid::from_u128(2));
    }

    // ===== Enum conversion =====

    #[test]
    fn test_account_type_round_trip() {
        for account_type in [
            AccountType::AssetReceivable,
            AccountType::LiabilityPayable,
            AccountType::AssetCash,
            AccountType::LiabilityCreditCard,
            AccountType::Other,
        ] {
            assert_eq!(
                account_type_from_model(account_type_to_model(account_type)),
                account_type
            );
        }
    }

    #[test]
    fn test_marker_display_types_map_to_markers() {
        assert!(display_type_from_model(sea_orm_active_enums::LineDisplayType::LineSection).is_marker());
        assert!(display_type_from_model(sea_orm_active_enums::LineDisplayType::LineNote).is_marker());
        assert!(!display_type_from_model(sea_orm_active_enums::LineDisplayType::Tax).is_marker());
    }

    // ===== Counterparts =====

    #[test]
    fn test_missing_counterparts_are_sorted_and_deduplicated() {
        let loaded = HashSet::from([Uuid::from_u128(1), Uuid::from_u128(2)]);
        let partials = vec![partial(1, 1, 9), partial(2, 8, 2), partial(3, 1, 9), partial(4, 1, 2)];

        assert_eq!(
            missing_counterparts(&partials, &loaded),
            vec![Uuid::from_u128(8), Uuid::from_u128(9)]
        );
    }

    #[test]
    fn test_chunked_lookups_stay_under_parameter_limit() {
        let ids: Vec<Uuid> = (0..40_000u128).map(Uuid::from_u128).collect();
        let chunks: Vec<&[Uuid]> = ids.chunks(MAX_IDS_PER_QUERY).collect();

        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|chunk| chunk.len() * 2 < usize::from(u16::MAX)));
        assert_eq!(chunks.iter().map(|chunk| chunk.len()).sum::<usize>(), ids.len());
    }

    // ===== Multi-company merge =====

    fn domain_line(id: u128, company: u128) -> LedgerLine {
        let mut model = line(id);
        model.company_id = Uuid::from_u128(company);
        line_from_model(
            model,
            Some(entry(Uuid::from_u128(100), sea_orm_active_enums::JournalEntryState::Posted)),
        )
        .unwrap()
    }

    #[test]
    fn test_merge_snapshots_unions_companies() {
        let first = LedgerSnapshot::new(
            vec![domain_line(3, 1), domain_line(1, 1)],
            vec![partial_from_model(partial(20, 1, 3))],
        );
        let second = LedgerSnapshot::new(
            vec![domain_line(2, 2)],
            vec![partial_from_model(partial(10, 2, 4))],
        );

        let merged = merge_snapshots([first, second]);

        let ids: Vec<Uuid> = merged.lines().iter().map(|line| line.id.into_inner()).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]);
        assert_eq!(merged.lines()[1].company_id.into_inner(), Uuid::from_u128(2));
        let partial_ids: Vec<Uuid> = merged.partials().iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(partial_ids, vec![Uuid::from_u128(10), Uuid::from_u128(20)]);
    }

    #[test]
    fn test_merge_snapshots_deduplicates_shared_rows() {
        let shared = partial_from_model(partial(10, 1, 2));
        let merged = merge_snapshots([
            LedgerSnapshot::new(vec![domain_line(1, 1), domain_line(2, 1)], vec![shared]),
            LedgerSnapshot::new(vec![domain_line(2, 1)], vec![shared]),
        ]);

        assert_eq!(merged.lines().len(), 2);
        assert_eq!(merged.partials().len(), 1);
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let merged = merge_snapshots(Vec::new());
        assert!(merged.lines().is_empty());
        assert!(merged.partials().is_empty());
    }

    // ===== Rollback =====

    #[test]
    fn test_settle_passes_loaded_value_through() {
        assert_eq!(settle(Ok(7), Ok(())).unwrap(), 7);
    }

    #[test]
    fn test_settle_reports_rollback_failure_after_successful_load() {
        let err = settle(Ok(7), Err(DbErr::Custom("rollback failed".into()))).unwrap_err();
        assert!(matches!(err, SnapshotError::Database(DbErr::Custom(msg)) if msg == "rollback failed"));
    }

    #[test]
    fn test_settle_prefers_load_error_over_rollback_failure() {
        let loaded: Result<(), SnapshotError> =
            Err(DbErr::Custom("canceling statement due to statement timeout".into()).into());
        let err = settle(loaded, Err(DbErr::Custom("rollback failed".into()))).unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::Database(DbErr::Custom(msg)) if msg.contains("statement timeout")
        ));
    }

    // ===== Errors =====

    #[test]
    fn test_snapshot_error_maps_to_app_error() {
        let err: AppError = SnapshotError::Revaluation(RevaluationError::MissingRate {
            currency_id: CurrencyId::from_uuid(Uuid::from_u128(1)),
        })
        .into();
        assert_eq!(err.error_code(), "REVALUATION_FAILED");

        let err: AppError = SnapshotError::Database(DbErr::Custom("boom".into())).into();
        assert_eq!(err.exit_code(), 69);
    }
}

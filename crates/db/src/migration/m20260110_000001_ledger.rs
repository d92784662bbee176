//! Ledger schema migration.
//!
//! Creates the enums, tables, indexes and RLS policies the revaluation
//! snapshot reads from.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(LEDGER_LINES_SQL).await?;
        db.execute_unprepared(PARTIAL_RECONCILIATIONS_SQL).await?;

        // ============================================================
        // PART 3: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset_receivable',
    'liability_payable',
    'asset_cash',
    'liability_credit_card',
    'other'
);

CREATE TYPE journal_entry_state AS ENUM ('draft', 'posted', 'cancelled');

CREATE TYPE line_display_type AS ENUM (
    'product',
    'line_section',
    'line_note',
    'payment_term',
    'tax',
    'rounding'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id                   UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id           UUID NOT NULL,
    code                 VARCHAR(64) NOT NULL,
    name                 VARCHAR(255) NOT NULL,
    account_type         account_type NOT NULL DEFAULT 'other',
    currency_revaluation BOOLEAN NOT NULL DEFAULT false,
    created_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_company_code UNIQUE (company_id, code)
);

CREATE INDEX idx_accounts_revaluation ON accounts(company_id) WHERE currency_revaluation;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id         UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL,
    state      journal_entry_state NOT NULL DEFAULT 'draft',
    date       DATE NOT NULL,
    reference  VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journal_entries_company_date ON journal_entries(company_id, date);
";

const LEDGER_LINES_SQL: &str = r"
CREATE TABLE ledger_lines (
    id                UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id        UUID NOT NULL,
    journal_entry_id  UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id        UUID NOT NULL REFERENCES accounts(id),
    partner_id        UUID,
    currency_id       UUID,
    debit             NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit            NUMERIC(19, 4) NOT NULL DEFAULT 0,
    amount_currency   NUMERIC(19, 4) NOT NULL DEFAULT 0,
    date              DATE NOT NULL,
    full_reconcile_id UUID,
    display_type      line_display_type NOT NULL DEFAULT 'product',
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_ledger_lines_non_negative CHECK (debit >= 0 AND credit >= 0)
);

CREATE INDEX idx_ledger_lines_revaluation
    ON ledger_lines(account_id, date)
    WHERE currency_id IS NOT NULL;
CREATE INDEX idx_ledger_lines_entry ON ledger_lines(journal_entry_id);
";

const PARTIAL_RECONCILIATIONS_SQL: &str = r"
CREATE TABLE partial_reconciliations (
    id             UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id     UUID NOT NULL,
    debit_line_id  UUID NOT NULL REFERENCES ledger_lines(id) ON DELETE CASCADE,
    credit_line_id UUID NOT NULL REFERENCES ledger_lines(id) ON DELETE CASCADE,
    amount         NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_partial_reconciliations_debit ON partial_reconciliations(debit_line_id);
CREATE INDEX idx_partial_reconciliations_credit ON partial_reconciliations(credit_line_id);
";

const RLS_SQL: &str = r"
-- ============================================================
-- ROW-LEVEL SECURITY POLICIES
-- Application sets context before queries: SET LOCAL app.current_company_id = 'company-uuid';
-- ============================================================

ALTER TABLE accounts ENABLE ROW LEVEL SECURITY;
ALTER TABLE journal_entries ENABLE ROW LEVEL SECURITY;
ALTER TABLE ledger_lines ENABLE ROW LEVEL SECURITY;
ALTER TABLE partial_reconciliations ENABLE ROW LEVEL SECURITY;

ALTER TABLE accounts FORCE ROW LEVEL SECURITY;
ALTER TABLE journal_entries FORCE ROW LEVEL SECURITY;
ALTER TABLE ledger_lines FORCE ROW LEVEL SECURITY;
ALTER TABLE partial_reconciliations FORCE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON accounts
    USING (company_id = current_setting('app.current_company_id', true)::UUID);

CREATE POLICY tenant_isolation ON journal_entries
    USING (company_id = current_setting('app.current_company_id', true)::UUID);

CREATE POLICY tenant_isolation ON ledger_lines
    USING (company_id = current_setting('app.current_company_id', true)::UUID);

CREATE POLICY tenant_isolation ON partial_reconciliations
    USING (company_id = current_setting('app.current_company_id', true)::UUID);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- ============================================================

DROP TABLE IF EXISTS partial_reconciliations CASCADE;
DROP TABLE IF EXISTS ledger_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP TYPE IF EXISTS line_display_type;
DROP TYPE IF EXISTS journal_entry_state;
DROP TYPE IF EXISTS account_type;
";

//! Initial database migration.
//!
//! Creates the ledger tables, the integrity triggers that back the
//! application rules, and the reporting indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: SHARED FUNCTIONS
        // ============================================================
        db.execute_unprepared(FUNCTIONS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: FINANCIAL YEARS
        // ============================================================
        db.execute_unprepared(FINANCIAL_YEARS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const FUNCTIONS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id              UUID PRIMARY KEY,
    tenant_id       UUID NOT NULL,
    parent_id       UUID,
    code            VARCHAR(20) NOT NULL,
    name            VARCHAR(255) NOT NULL,
    account_type    VARCHAR(16) NOT NULL,
    sub_type        VARCHAR(32),
    is_system       BOOLEAN NOT NULL DEFAULT FALSE,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    description     TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_tenant_code UNIQUE (tenant_id, code),
    CONSTRAINT uq_accounts_tenant_id UNIQUE (tenant_id, id),
    CONSTRAINT fk_accounts_parent FOREIGN KEY (tenant_id, parent_id)
        REFERENCES accounts (tenant_id, id),
    CONSTRAINT chk_accounts_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id),
    CONSTRAINT chk_accounts_type CHECK (
        account_type IN ('asset', 'liability', 'equity', 'income', 'expense')
    ),
    CONSTRAINT chk_accounts_sub_type CHECK (
        sub_type IS NULL
        OR (account_type = 'asset' AND sub_type IN ('current_asset', 'non_current_asset', 'bank_cash'))
        OR (account_type = 'liability' AND sub_type IN ('current_liability', 'non_current_liability'))
        OR (account_type = 'equity' AND sub_type = 'equity')
        OR (account_type = 'income' AND sub_type IN ('revenue', 'other_income'))
        OR (account_type = 'expense' AND sub_type IN
            ('cogs', 'employee_expense', 'depreciation', 'finance_cost', 'other_expense'))
    )
);

CREATE INDEX idx_accounts_tenant_active ON accounts (tenant_id, is_active);
CREATE INDEX idx_accounts_parent ON accounts (parent_id) WHERE parent_id IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY,
    tenant_id       UUID NOT NULL,
    entry_date      DATE NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    reference       VARCHAR(100),
    source          VARCHAR(16) NOT NULL DEFAULT 'manual',
    source_id       UUID,
    status          VARCHAR(16) NOT NULL DEFAULT 'posted',
    reversed_by     UUID REFERENCES journal_entries (id),
    created_by      UUID,
    fiscal_year     INTEGER NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_entries_status CHECK (status IN ('draft', 'posted', 'voided')),
    CONSTRAINT chk_entries_source CHECK (
        source IN ('manual', 'invoice', 'payment', 'inventory', 'void')
    ),
    CONSTRAINT chk_entries_fiscal_year CHECK (
        fiscal_year = EXTRACT(YEAR FROM entry_date)::INTEGER
    ),
    CONSTRAINT chk_entries_void_link CHECK (
        (status = 'voided') = (reversed_by IS NOT NULL)
    ),
    CONSTRAINT chk_entries_not_self_reversed CHECK (reversed_by IS NULL OR reversed_by <> id)
);

CREATE INDEX idx_entries_tenant_date ON journal_entries (tenant_id, entry_date DESC, created_at DESC);
CREATE INDEX idx_entries_tenant_status ON journal_entries (tenant_id, status);
CREATE INDEX idx_entries_source ON journal_entries (source, source_id) WHERE source_id IS NOT NULL;
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id              UUID PRIMARY KEY,
    entry_id        UUID NOT NULL REFERENCES journal_entries (id) ON DELETE CASCADE,
    line_no         INTEGER NOT NULL,
    account_id      UUID NOT NULL REFERENCES accounts (id),
    debit           NUMERIC(15, 2) NOT NULL DEFAULT 0,
    credit          NUMERIC(15, 2) NOT NULL DEFAULT 0,
    description     VARCHAR(500),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_lines_entry_line_no UNIQUE (entry_id, line_no),
    CONSTRAINT chk_lines_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_lines_one_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_lines_account ON journal_lines (account_id);
";

const FINANCIAL_YEARS_SQL: &str = r"
CREATE TABLE financial_years (
    id              UUID PRIMARY KEY,
    tenant_id       UUID NOT NULL,
    year            INTEGER NOT NULL,
    is_locked       BOOLEAN NOT NULL DEFAULT FALSE,
    locked_by       UUID,
    locked_at       TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_financial_years_tenant_year UNIQUE (tenant_id, year),
    CONSTRAINT chk_financial_years_lock_time CHECK (NOT is_locked OR locked_at IS NOT NULL)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- Debits must equal credits for every posted or voided entry
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    entry_status VARCHAR(16);
    total_debit NUMERIC(15, 2);
    total_credit NUMERIC(15, 2);
BEGIN
    SELECT status INTO entry_status
    FROM journal_entries
    WHERE id = NEW.entry_id;

    IF entry_status IN ('posted', 'voided') THEN
        SELECT
            COALESCE(SUM(debit), 0),
            COALESCE(SUM(credit), 0)
        INTO total_debit, total_credit
        FROM journal_lines
        WHERE entry_id = NEW.entry_id;

        IF total_debit <> total_credit THEN
            RAISE EXCEPTION 'Journal entry not balanced: Dr=% Cr=%',
                total_debit, total_credit;
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER INSERT OR UPDATE ON journal_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: prevent_posted_line_modification
-- Lines of a posted or voided entry are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    entry_status VARCHAR(16);
BEGIN
    SELECT status INTO entry_status
    FROM journal_entries
    WHERE id = OLD.entry_id;

    IF entry_status IN ('posted', 'voided') THEN
        RAISE EXCEPTION 'Cannot modify lines of a % journal entry. Void it instead.', entry_status;
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE UPDATE OR DELETE ON journal_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_modification();

-- ============================================================
-- FUNCTION: prevent_posted_modification
-- Posted entries may only move to voided, voided entries are frozen
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status = 'voided' THEN
        RAISE EXCEPTION 'Cannot modify voided journal entry.';
    END IF;

    IF OLD.status = 'posted' THEN
        IF NEW.status <> 'voided' THEN
            RAISE EXCEPTION 'Cannot modify posted journal entry. Void it instead.';
        END IF;

        IF NEW.tenant_id IS DISTINCT FROM OLD.tenant_id
            OR NEW.entry_date IS DISTINCT FROM OLD.entry_date
            OR NEW.description IS DISTINCT FROM OLD.description
            OR NEW.reference IS DISTINCT FROM OLD.reference
            OR NEW.source IS DISTINCT FROM OLD.source
            OR NEW.source_id IS DISTINCT FROM OLD.source_id
            OR NEW.created_by IS DISTINCT FROM OLD.created_by
            OR NEW.fiscal_year IS DISTINCT FROM OLD.fiscal_year
            OR NEW.created_at IS DISTINCT FROM OLD.created_at THEN
            RAISE EXCEPTION 'Voiding may only set status and reversed_by.';
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_mod
BEFORE UPDATE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_modification();

CREATE OR REPLACE FUNCTION prevent_posted_deletion()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status <> 'draft' THEN
        RAISE EXCEPTION 'Cannot delete % journal entry.', OLD.status;
    END IF;
    RETURN OLD;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_delete
BEFORE DELETE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_deletion();

CREATE TRIGGER trg_journal_entries_updated_at
BEFORE UPDATE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

-- ============================================================
-- FUNCTION: validate_financial_year_posting
-- No entry may be written into a locked year
-- ============================================================
CREATE OR REPLACE FUNCTION validate_financial_year_posting()
RETURNS TRIGGER AS $$
BEGIN
    IF EXISTS (
        SELECT 1 FROM financial_years
        WHERE tenant_id = NEW.tenant_id
          AND year = NEW.fiscal_year
          AND is_locked
    ) THEN
        RAISE EXCEPTION 'Financial year % is locked. No new postings allowed.', NEW.fiscal_year;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_validate_financial_year
BEFORE INSERT ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION validate_financial_year_posting();

-- ============================================================
-- FUNCTION: prevent_year_unlock
-- Locking a financial year is one-way
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_year_unlock()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.is_locked THEN
        RAISE EXCEPTION 'Financial year % is locked and cannot be changed.', OLD.year;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_year_unlock
BEFORE UPDATE OR DELETE ON financial_years
FOR EACH ROW
EXECUTE FUNCTION prevent_year_unlock();

-- ============================================================
-- FUNCTION: protect_system_accounts
-- Seeded accounts keep their code, type, parent and active flag
-- ============================================================
CREATE OR REPLACE FUNCTION protect_system_accounts()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        IF OLD.is_system THEN
            RAISE EXCEPTION 'System accounts cannot be deleted.';
        END IF;
        RETURN OLD;
    END IF;

    IF OLD.is_system AND (
        NEW.code IS DISTINCT FROM OLD.code
        OR NEW.account_type IS DISTINCT FROM OLD.account_type
        OR NEW.parent_id IS DISTINCT FROM OLD.parent_id
        OR NEW.is_system IS DISTINCT FROM OLD.is_system
        OR (OLD.is_active AND NOT NEW.is_active)
    ) THEN
        RAISE EXCEPTION 'System account % cannot be restructured.', OLD.code;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_protect_system_accounts
BEFORE UPDATE OR DELETE ON accounts
FOR EACH ROW
EXECUTE FUNCTION protect_system_accounts();

CREATE TRIGGER trg_accounts_updated_at
BEFORE UPDATE ON accounts
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- ============================================================

DROP TRIGGER IF EXISTS trg_accounts_updated_at ON accounts;
DROP TRIGGER IF EXISTS trg_protect_system_accounts ON accounts;
DROP TRIGGER IF EXISTS trg_prevent_year_unlock ON financial_years;
DROP TRIGGER IF EXISTS trg_validate_financial_year ON journal_entries;
DROP TRIGGER IF EXISTS trg_journal_entries_updated_at ON journal_entries;
DROP TRIGGER IF EXISTS trg_prevent_posted_delete ON journal_entries;
DROP TRIGGER IF EXISTS trg_prevent_posted_mod ON journal_entries;
DROP TRIGGER IF EXISTS trg_prevent_posted_line_mod ON journal_lines;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_lines;

DROP FUNCTION IF EXISTS protect_system_accounts();
DROP FUNCTION IF EXISTS prevent_year_unlock();
DROP FUNCTION IF EXISTS validate_financial_year_posting();
DROP FUNCTION IF EXISTS prevent_posted_deletion();
DROP FUNCTION IF EXISTS prevent_posted_modification();
DROP FUNCTION IF EXISTS prevent_posted_line_modification();
DROP FUNCTION IF EXISTS check_entry_balance();
DROP FUNCTION IF EXISTS set_updated_at();

DROP TABLE IF EXISTS financial_years CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
";

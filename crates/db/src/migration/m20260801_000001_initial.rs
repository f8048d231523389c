//! Initial database migration.
//!
//! Creates all core tables, enums, triggers, and seed roles for the pharmacy
//! schema.

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
        // PART 2: ACCESS CONTROL
        // ============================================================
        db.execute_unprepared(ROLES_SQL).await?;
        db.execute_unprepared(PERMISSIONS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(SESSIONS_SQL).await?;

        // ============================================================
        // PART 3: PARTIES
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(PROVIDERS_SQL).await?;

        // ============================================================
        // PART 4: INVENTORY
        // ============================================================
        db.execute_unprepared(MEDICINE_SQL).await?;

        // ============================================================
        // PART 5: SALES
        // ============================================================
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(SALE_ITEMS_SQL).await?;

        // ============================================================
        // PART 6: PRESCRIPTIONS
        // ============================================================
        db.execute_unprepared(PRESCRIPTIONS_SQL).await?;
        db.execute_unprepared(PRESCRIPTION_MEDICINES_SQL).await?;

        // ============================================================
        // PART 7: AUDIT LOG
        // ============================================================
        db.execute_unprepared(AUDIT_LOG_SQL).await?;

        // ============================================================
        // PART 8: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 9: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_ROLES_SQL).await?;

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
-- Sale lifecycle: created completed, optionally cancelled by an admin
CREATE TYPE sale_status AS ENUM ('completed', 'cancelled');
";

const ROLES_SQL: &str = r"
CREATE TABLE roles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PERMISSIONS_SQL: &str = r"
CREATE TABLE permissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    action VARCHAR(100) NOT NULL,
    UNIQUE (role_id, action)
);

CREATE INDEX idx_permissions_role ON permissions(role_id);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role_id UUID NOT NULL REFERENCES roles(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    refresh_token_hash VARCHAR(64) NOT NULL,
    user_agent VARCHAR(512),
    ip_address VARCHAR(64),
    expires_at TIMESTAMPTZ NOT NULL,
    revoked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_sessions_token ON sessions(refresh_token_hash) WHERE revoked_at IS NULL;
CREATE INDEX idx_sessions_user ON sessions(user_id);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) UNIQUE,
    phone VARCHAR(50) UNIQUE,
    cedula VARCHAR(50),
    rnc VARCHAR(50),
    address VARCHAR(512),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROVIDERS_SQL: &str = r"
CREATE TABLE providers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    contact_name VARCHAR(255),
    email VARCHAR(255),
    phone VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MEDICINE_SQL: &str = r"
CREATE TABLE medicine (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    price DECIMAL(10, 2) NOT NULL CHECK (price >= 0),
    expiration_date DATE NOT NULL,
    lot_number VARCHAR(100) NOT NULL,
    category VARCHAR(100),
    barcode VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_medicine_name ON medicine(name);
CREATE INDEX idx_medicine_category ON medicine(category) WHERE category IS NOT NULL;
CREATE INDEX idx_medicine_expiration ON medicine(expiration_date);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    client_id UUID REFERENCES clients(id),
    total DECIMAL(12, 2) NOT NULL CHECK (total >= 0),
    payment_method VARCHAR(50) NOT NULL,
    status sale_status NOT NULL DEFAULT 'completed',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    cancelled_at TIMESTAMPTZ
);

CREATE INDEX idx_sales_created ON sales(created_at DESC);
CREATE INDEX idx_sales_client ON sales(client_id) WHERE client_id IS NOT NULL;
";

const SALE_ITEMS_SQL: &str = r"
CREATE TABLE sale_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    -- RESTRICT: a medicine referenced by a sale is never physically deleted
    medicine_id UUID NOT NULL REFERENCES medicine(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    unit_price DECIMAL(10, 2) NOT NULL,
    total_price DECIMAL(12, 2) NOT NULL
);

CREATE INDEX idx_sale_items_sale ON sale_items(sale_id);
CREATE INDEX idx_sale_items_medicine ON sale_items(medicine_id);
";

const PRESCRIPTIONS_SQL: &str = r"
CREATE TABLE prescriptions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id),
    issued_by UUID NOT NULL REFERENCES users(id),
    doctor VARCHAR(255),
    notes TEXT,
    issued_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_prescriptions_client ON prescriptions(client_id);
CREATE INDEX idx_prescriptions_issued ON prescriptions(issued_at DESC);
";

const PRESCRIPTION_MEDICINES_SQL: &str = r"
CREATE TABLE prescription_medicines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    prescription_id UUID NOT NULL REFERENCES prescriptions(id) ON DELETE CASCADE,
    medicine_id UUID NOT NULL REFERENCES medicine(id),
    quantity INTEGER NOT NULL CHECK (quantity > 0)
);

CREATE INDEX idx_prescription_medicines_rx ON prescription_medicines(prescription_id);
";

const AUDIT_LOG_SQL: &str = r"
CREATE TABLE audit_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID REFERENCES users(id) ON DELETE SET NULL,
    action VARCHAR(100) NOT NULL,
    details TEXT,
    target_table VARCHAR(100),
    target_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_log_created ON audit_log(created_at DESC);
CREATE INDEX idx_audit_log_user ON audit_log(user_id) WHERE user_id IS NOT NULL;
CREATE INDEX idx_audit_log_action ON audit_log(action);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_clients_updated_at
    BEFORE UPDATE ON clients
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_providers_updated_at
    BEFORE UPDATE ON providers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_medicine_updated_at
    BEFORE UPDATE ON medicine
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_sessions_updated_at
    BEFORE UPDATE ON sessions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_ROLES_SQL: &str = r"
INSERT INTO roles (id, name) VALUES
    ('00000000-0000-0000-0000-000000000001', 'admin'),
    ('00000000-0000-0000-0000-000000000002', 'pharmacist'),
    ('00000000-0000-0000-0000-000000000003', 'cashier');

INSERT INTO permissions (role_id, action)
SELECT '00000000-0000-0000-0000-000000000001', a
FROM unnest(ARRAY[
    'inventory:read', 'inventory:write',
    'sales:read', 'sales:write', 'sales:cancel',
    'prescriptions:read', 'prescriptions:write',
    'clients:read', 'clients:write',
    'providers:read', 'providers:write',
    'roles:manage', 'users:manage', 'audit:read', 'backups:manage'
]) AS a;

INSERT INTO permissions (role_id, action)
SELECT '00000000-0000-0000-0000-000000000002', a
FROM unnest(ARRAY[
    'inventory:read', 'inventory:write',
    'sales:read', 'sales:write',
    'prescriptions:read', 'prescriptions:write',
    'clients:read', 'clients:write'
]) AS a;

INSERT INTO permissions (role_id, action)
SELECT '00000000-0000-0000-0000-000000000003', a
FROM unnest(ARRAY[
    'inventory:read', 'sales:read', 'sales:write', 'clients:read'
]) AS a;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_log CASCADE;
DROP TABLE IF EXISTS prescription_medicines CASCADE;
DROP TABLE IF EXISTS prescriptions CASCADE;
DROP TABLE IF EXISTS sale_items CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS medicine CASCADE;
DROP TABLE IF EXISTS providers CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TABLE IF EXISTS sessions CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS permissions CASCADE;
DROP TABLE IF EXISTS roles CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS sale_status CASCADE;
";

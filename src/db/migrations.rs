//! Versioned schema migrations.
//!
//! Each migration carries one statement list per backend. Applied versions are
//! recorded in `schema_migrations`, so running the set twice is a no-op.
//!
//! Constraint and index names follow a fixed convention:
//! `ix_<table>_<column>`, `uq_<table>_<column>`, `ck_<table>_<name>`,
//! `fk_<table>_<column>_<referred_table>` and `pk_<table>`.

use chrono::Utc;
use sqlx::AnyPool;

use super::DatabaseBackend;

/// A single schema change.
#[derive(Debug)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    postgres: &'static [&'static str],
    sqlite: &'static [&'static str],
}

impl Migration {
    pub fn statements(&self, backend: DatabaseBackend) -> &'static [&'static str] {
        match backend {
            DatabaseBackend::Postgres => self.postgres,
            DatabaseBackend::Sqlite => self.sqlite,
        }
    }
}

const CREATE_MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version BIGINT NOT NULL,
    description TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    CONSTRAINT pk_schema_migrations PRIMARY KEY (version)
)"#;

/// All migrations in application order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create blogs table",
    postgres: &[
        r#"
CREATE TABLE IF NOT EXISTS blogs (
    id BIGINT GENERATED BY DEFAULT AS IDENTITY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    content TEXT NOT NULL,
    CONSTRAINT pk_blogs PRIMARY KEY (id),
    CONSTRAINT ck_blogs_title_length CHECK (char_length(title) <= 100),
    CONSTRAINT ck_blogs_description_length CHECK (char_length(description) <= 500)
)"#,
        "CREATE INDEX IF NOT EXISTS ix_blogs_id ON blogs (id)",
        "CREATE INDEX IF NOT EXISTS ix_blogs_title ON blogs (title)",
    ],
    // INTEGER primary key aliases the rowid, which SQLite assigns on insert.
    sqlite: &[
        r#"
CREATE TABLE IF NOT EXISTS blogs (
    id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    content TEXT NOT NULL,
    CONSTRAINT pk_blogs PRIMARY KEY (id),
    CONSTRAINT ck_blogs_title_length CHECK (length(title) <= 100),
    CONSTRAINT ck_blogs_description_length CHECK (length(description) <= 500)
)"#,
        "CREATE INDEX IF NOT EXISTS ix_blogs_id ON blogs (id)",
        "CREATE INDEX IF NOT EXISTS ix_blogs_title ON blogs (title)",
    ],
}];

/// Versions already recorded in `schema_migrations`, ascending.
pub async fn applied_versions(pool: &AnyPool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    sqlx::query_scalar::<_, i64>("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
}

/// Migrations not yet applied to this database.
pub async fn pending_migrations(pool: &AnyPool) -> Result<Vec<&'static Migration>, sqlx::Error> {
    let applied = applied_versions(pool).await?;
    Ok(MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect())
}

/// Apply every pending migration, each inside its own transaction.
///
/// Returns the migrations that were applied by this call.
pub async fn run_migrations(
    pool: &AnyPool,
    backend: DatabaseBackend,
) -> Result<Vec<&'static Migration>, sqlx::Error> {
    let pending = pending_migrations(pool).await?;

    for migration in &pending {
        let mut tx = pool.begin().await?;

        for statement in migration.statements(backend) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES ($1, $2, $3)",
        )
        .bind(migration.version)
        .bind(migration.description)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(pending)
}

/// Render the full migration script for `backend` without connecting.
pub fn offline_script(backend: DatabaseBackend) -> String {
    let mut script = String::from("BEGIN;\n");
    script.push_str(CREATE_MIGRATIONS_TABLE.trim());
    script.push_str(";\n");

    for migration in MIGRATIONS {
        script.push_str(&format!(
            "\n-- Migration {}: {}\n",
            migration.version, migration.description
        ));
        for statement in migration.statements(backend) {
            script.push_str(statement.trim());
            script.push_str(";\n");
        }
        script.push_str(&format!(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES ({}, '{}', CURRENT_TIMESTAMP);\n",
            migration.version,
            migration.description.replace('\'', "''")
        ));
    }

    script.push_str("\nCOMMIT;\n");
    script
}

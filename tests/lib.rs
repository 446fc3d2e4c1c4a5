//! Helpers for tests that need a real Postgres server.
//!
//! Point `TEST_DATABASE_URL` at a server the tests may create databases on;
//! when it is unset the Postgres tests return early.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use uuid::Uuid;

/// Scratch database created for one test and dropped by [`PgScratch::cleanup`].
pub struct PgScratch {
    pub db: DatabaseConnection,
    admin_url: String,
    db_name: String,
}

impl PgScratch {
    pub async fn migrated() -> Result<Option<Self>> {
        let Ok(base) = std::env::var("TEST_DATABASE_URL") else {
            return Ok(None);
        };
        let (admin_url, db_name, test_url) = scratch_urls(&base)?;
        let admin = Database::connect(&admin_url).await?;
        exec(&admin, format!("CREATE DATABASE \"{db_name}\"")).await?;
        let db = Database::connect(&test_url).await?;
        Migrator::up(&db, None).await?;
        Ok(Some(Self {
            db,
            admin_url,
            db_name,
        }))
    }

    pub async fn cleanup(self) -> Result<()> {
        let Self {
            db,
            admin_url,
            db_name,
        } = self;
        drop(db);
        let admin = Database::connect(&admin_url).await?;
        exec(
            &admin,
            format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"),
        )
        .await
    }
}

/// Admin url, scratch database name and scratch url derived from `base`.
fn scratch_urls(base: &str) -> Result<(String, String, String)> {
    let (prefix, path) = base
        .rsplit_once('/')
        .context("TEST_DATABASE_URL must look like postgres://user@host/db")?;
    let base_name = path.split('?').next().unwrap_or_default();
    let base_name = if base_name.is_empty() {
        "directory_test"
    } else {
        base_name
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    Ok((
        format!("{prefix}/postgres"),
        db_name.clone(),
        format!("{prefix}/{db_name}"),
    ))
}

async fn exec(db: &DatabaseConnection, sql: impl Into<String>) -> Result<()> {
    db.execute(Statement::from_string(DatabaseBackend::Postgres, sql.into()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_urls_share_the_server() {
        let (admin, name, scratch) =
            scratch_urls("postgres://app:pw@localhost:5432/directory").unwrap();
        assert_eq!(admin, "postgres://app:pw@localhost:5432/postgres");
        assert!(name.starts_with("directory_"));
        assert_eq!(scratch, format!("postgres://app:pw@localhost:5432/{name}"));
    }
}

//! SQLite override store
//!
//! Implements `OverrideAdapter` on a single SQLite file in WAL mode.

#![forbid(unsafe_code)]

mod schema;
mod setting;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use tenconf_types::override_adapter::{OverrideAdapter, TenantConfiguration};
use tenconf_types::prelude::*;

#[derive(Debug)]
pub struct OverrideAdapterSqlite {
	db: SqlitePool,
}

impl OverrideAdapterSqlite {
	/// Open (or create) the database file at `path` and bring the schema up to date
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(dir).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		info!("Override store opened at {}", path.display());
		Ok(Self { db })
	}
}

#[async_trait]
impl OverrideAdapter for OverrideAdapterSqlite {
	async fn read_override(
		&self,
		tn_id: TnId,
		key: &str,
	) -> ClResult<Option<TenantConfiguration>> {
		setting::read(&self.db, tn_id, key).await
	}

	async fn list_overrides(
		&self,
		tn_id: TnId,
		prefix: Option<&str>,
	) -> ClResult<Vec<TenantConfiguration>> {
		setting::list(&self.db, tn_id, prefix).await
	}

	async fn upsert_override(
		&self,
		tn_id: TnId,
		key: &str,
		value: &str,
	) -> ClResult<TenantConfiguration> {
		setting::upsert(&self.db, tn_id, key, value).await
	}

	async fn delete_override(&self, tn_id: TnId, key: &str) -> ClResult<bool> {
		setting::delete(&self.db, tn_id, key).await
	}
}

// vim: ts=4

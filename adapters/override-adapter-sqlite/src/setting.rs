//! Tenant override rows
//!
//! One row per (tenant, key). Values are stored in their raw encoded form; the
//! store never interprets them.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use tenconf_types::override_adapter::TenantConfiguration;
use tenconf_types::prelude::*;
use tenconf_types::types::now;

fn to_row(tn_id: TnId, row: &SqliteRow) -> Result<TenantConfiguration, sqlx::Error> {
	let name: String = row.try_get("name")?;
	let value: String = row.try_get("value")?;
	Ok(TenantConfiguration {
		tn_id,
		key: name.into_boxed_str(),
		value: value.into_boxed_str(),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

/// List a tenant's overrides, optionally only keys starting with `prefix`
pub(crate) async fn list(
	db: &SqlitePool,
	tn_id: TnId,
	prefix: Option<&str>,
) -> ClResult<Vec<TenantConfiguration>> {
	// substr() instead of LIKE: keys may contain '_' which LIKE treats as a wildcard
	let rows = if let Some(prefix) = prefix {
		sqlx::query(
			"SELECT name, value, created_at, updated_at FROM settings
			WHERE tn_id = ?1 AND substr(name, 1, length(?2)) = ?2 ORDER BY name",
		)
		.bind(tn_id.0)
		.bind(prefix)
		.fetch_all(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?
	} else {
		sqlx::query(
			"SELECT name, value, created_at, updated_at FROM settings
			WHERE tn_id = ? ORDER BY name",
		)
		.bind(tn_id.0)
		.fetch_all(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?
	};

	rows.iter()
		.map(|row| to_row(tn_id, row))
		.collect::<Result<Vec<_>, _>>()
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)
}

/// Read a single override by key
pub(crate) async fn read(
	db: &SqlitePool,
	tn_id: TnId,
	name: &str,
) -> ClResult<Option<TenantConfiguration>> {
	let row = sqlx::query(
		"SELECT name, value, created_at, updated_at FROM settings WHERE tn_id = ? AND name = ?",
	)
	.bind(tn_id.0)
	.bind(name)
	.fetch_optional(db)
	.await
	.inspect_err(|err| warn!("DB: {:#?}", err))
	.map_err(|_| Error::DbError)?;

	row.map(|row| to_row(tn_id, &row))
		.transpose()
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)
}

/// Create or replace an override in a single statement
pub(crate) async fn upsert(
	db: &SqlitePool,
	tn_id: TnId,
	name: &str,
	value: &str,
) -> ClResult<TenantConfiguration> {
	let row = sqlx::query(
		"INSERT INTO settings (tn_id, name, value, created_at, updated_at)
		VALUES (?1, ?2, ?3, ?4, ?4)
		ON CONFLICT(tn_id, name) DO UPDATE
			SET value = excluded.value, updated_at = max(excluded.updated_at, settings.updated_at)
		RETURNING name, value, created_at, updated_at",
	)
	.bind(tn_id.0)
	.bind(name)
	.bind(value)
	.bind(now().0)
	.fetch_one(db)
	.await
	.inspect_err(|err| warn!("DB: {:#?}", err))
	.map_err(|_| Error::DbError)?;

	to_row(tn_id, &row).inspect_err(|err| warn!("DB: {:#?}", err)).map_err(|_| Error::DbError)
}

/// Delete an override, reporting whether a row existed
pub(crate) async fn delete(db: &SqlitePool, tn_id: TnId, name: &str) -> ClResult<bool> {
	let res = sqlx::query("DELETE FROM settings WHERE tn_id = ? AND name = ?")
		.bind(tn_id.0)
		.bind(name)
		.execute(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

// vim: ts=4

//! In-memory collaborators for manager tests
//!
//! `MemoryOverrideAdapter` counts store calls so tests can assert that a path
//! did (or did not) touch the store. `FailingDefaults` stands in for an
//! unavailable defaults source.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tenconf_types::defaults_provider::DefaultsProvider;
use tenconf_types::error::{ClResult, Error};
use tenconf_types::override_adapter::{OverrideAdapter, TenantConfiguration};
use tenconf_types::types::{Timestamp, TnId, now};

#[derive(Debug, Default)]
pub struct MemoryOverrideAdapter {
	rows: RwLock<HashMap<(TnId, String), TenantConfiguration>>,
	reads: AtomicUsize,
	writes: AtomicUsize,
	fail: RwLock<bool>,
}

impl MemoryOverrideAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a row directly, bypassing validation (simulates stale data)
	pub fn insert_raw(&self, tn_id: TnId, key: &str, value: &str) {
		let ts = now();
		self.rows.write().insert(
			(tn_id, key.to_string()),
			TenantConfiguration {
				tn_id,
				key: key.into(),
				value: value.into(),
				created_at: ts,
				updated_at: ts,
			},
		);
	}

	pub fn raw(&self, tn_id: TnId, key: &str) -> Option<String> {
		self.rows.read().get(&(tn_id, key.to_string())).map(|row| row.value.to_string())
	}

	pub fn raw_row(&self, tn_id: TnId, key: &str) -> Option<TenantConfiguration> {
		self.rows.read().get(&(tn_id, key.to_string())).cloned()
	}

	pub fn row_count(&self) -> usize {
		self.rows.read().len()
	}

	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	/// Make every following call fail with a database error
	pub fn set_failing(&self, fail: bool) {
		*self.fail.write() = fail;
	}

	fn check(&self) -> ClResult<()> {
		if *self.fail.read() { Err(Error::DbError) } else { Ok(()) }
	}
}

#[async_trait]
impl OverrideAdapter for MemoryOverrideAdapter {
	async fn read_override(
		&self,
		tn_id: TnId,
		key: &str,
	) -> ClResult<Option<TenantConfiguration>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.check()?;
		Ok(self.rows.read().get(&(tn_id, key.to_string())).cloned())
	}

	async fn list_overrides(
		&self,
		tn_id: TnId,
		prefix: Option<&str>,
	) -> ClResult<Vec<TenantConfiguration>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.check()?;
		let mut rows: Vec<TenantConfiguration> = self
			.rows
			.read()
			.values()
			.filter(|row| row.tn_id == tn_id)
			.filter(|row| prefix.is_none_or(|p| row.key.starts_with(p)))
			.cloned()
			.collect();
		rows.sort_by(|a, b| a.key.cmp(&b.key));
		Ok(rows)
	}

	async fn upsert_override(
		&self,
		tn_id: TnId,
		key: &str,
		value: &str,
	) -> ClResult<TenantConfiguration> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.check()?;
		let ts = now();
		let mut rows = self.rows.write();
		let row = rows.entry((tn_id, key.to_string())).or_insert_with(|| TenantConfiguration {
			tn_id,
			key: key.into(),
			value: value.into(),
			created_at: ts,
			updated_at: ts,
		});
		row.value = value.into();
		row.updated_at = Timestamp(ts.0.max(row.updated_at.0));
		Ok(row.clone())
	}

	async fn delete_override(&self, tn_id: TnId, key: &str) -> ClResult<bool> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.check()?;
		Ok(self.rows.write().remove(&(tn_id, key.to_string())).is_some())
	}
}

#[derive(Debug)]
pub struct FailingDefaults;

#[async_trait]
impl DefaultsProvider for FailingDefaults {
	async fn read_default(&self, _key: &str) -> ClResult<Option<Box<str>>> {
		Err(Error::ServiceUnavailable("defaults source offline".into()))
	}
}

/// Common test setup helper
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

// vim: ts=4

//! Override store adapter trait
//!
//! Persists tenant-scoped overrides as raw (string-encoded) values. At most one
//! row exists per (tenant, key). Implementations own atomicity of the upsert;
//! concurrent writers to the same row resolve as last-writer-wins.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::prelude::*;

/// One tenant's override for one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfiguration {
	pub tn_id: TnId,
	pub key: Box<str>,
	/// Raw encoded value
	pub value: Box<str>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

#[async_trait]
pub trait OverrideAdapter: Debug + Send + Sync {
	/// Read the override row for a key, `None` if the tenant has none
	async fn read_override(
		&self,
		tn_id: TnId,
		key: &str,
	) -> ClResult<Option<TenantConfiguration>>;

	/// List all override rows of a tenant, optionally restricted to a key prefix
	async fn list_overrides(
		&self,
		tn_id: TnId,
		prefix: Option<&str>,
	) -> ClResult<Vec<TenantConfiguration>>;

	/// Create the row or replace its value, returning the stored row
	async fn upsert_override(
		&self,
		tn_id: TnId,
		key: &str,
		value: &str,
	) -> ClResult<TenantConfiguration>;

	/// Remove the row. Returns `false` if there was nothing to remove.
	async fn delete_override(&self, tn_id: TnId, key: &str) -> ClResult<bool>;
}

// vim: ts=4

//! Override store CRUD tests
//!
//! Upsert, read, list, delete and tenant separation against a real database file

use tempfile::TempDir;
use tenconf_override_adapter_sqlite::OverrideAdapterSqlite;
use tenconf_types::override_adapter::OverrideAdapter;
use tenconf_types::types::TnId;

async fn create_test_adapter() -> (OverrideAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = OverrideAdapterSqlite::new(temp_dir.path().join("tenconf.db"))
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

#[tokio::test]
async fn test_read_missing_override() {
	let (adapter, _temp) = create_test_adapter().await;

	let row = adapter.read_override(TnId(1), "polling.time").await.unwrap();
	assert!(row.is_none());
}

#[tokio::test]
async fn test_upsert_and_read() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	let stored = adapter.upsert_override(tn_id, "polling.time", "60").await.unwrap();
	assert_eq!(stored.tn_id, tn_id);
	assert_eq!(&*stored.key, "polling.time");
	assert_eq!(&*stored.value, "60");
	assert!(stored.created_at.0 > 0);

	let row = adapter.read_override(tn_id, "polling.time").await.unwrap().unwrap();
	assert_eq!(row, stored);
}

#[tokio::test]
async fn test_upsert_replaces_value() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	let first = adapter.upsert_override(tn_id, "polling.time", "60").await.unwrap();
	let second = adapter.upsert_override(tn_id, "polling.time", "90").await.unwrap();

	assert_eq!(&*second.value, "90");
	assert_eq!(second.created_at, first.created_at);
	assert!(second.updated_at >= first.updated_at);

	let rows = adapter.list_overrides(tn_id, None).await.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(&*rows[0].value, "90");
}

#[tokio::test]
async fn test_delete() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	adapter.upsert_override(tn_id, "polling.time", "60").await.unwrap();
	assert!(adapter.delete_override(tn_id, "polling.time").await.unwrap());
	assert!(adapter.read_override(tn_id, "polling.time").await.unwrap().is_none());

	// Nothing left to delete
	assert!(!adapter.delete_override(tn_id, "polling.time").await.unwrap());
}

#[tokio::test]
async fn test_tenant_separation() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.upsert_override(TnId(1), "polling.time", "60").await.unwrap();
	adapter.upsert_override(TnId(2), "polling.time", "90").await.unwrap();

	let a = adapter.read_override(TnId(1), "polling.time").await.unwrap().unwrap();
	let b = adapter.read_override(TnId(2), "polling.time").await.unwrap().unwrap();
	assert_eq!(&*a.value, "60");
	assert_eq!(&*b.value, "90");

	adapter.delete_override(TnId(1), "polling.time").await.unwrap();
	assert!(adapter.read_override(TnId(2), "polling.time").await.unwrap().is_some());
	assert!(adapter.list_overrides(TnId(3), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_with_prefix() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	for (key, value) in [
		("action.cleanup.enabled", "true"),
		("action.cleanup.actionExpiry", "1000"),
		("actionXcleanup", "x"),
		("polling.time", "60"),
	] {
		adapter.upsert_override(tn_id, key, value).await.unwrap();
	}
	adapter.upsert_override(TnId(2), "action.cleanup.enabled", "false").await.unwrap();

	let rows = adapter.list_overrides(tn_id, Some("action.cleanup.")).await.unwrap();
	let keys: Vec<&str> = rows.iter().map(|row| &*row.key).collect();
	assert_eq!(keys, vec!["action.cleanup.actionExpiry", "action.cleanup.enabled"]);

	let all = adapter.list_overrides(tn_id, None).await.unwrap();
	assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_prefix_is_not_a_pattern() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	adapter.upsert_override(tn_id, "a_b", "1").await.unwrap();
	adapter.upsert_override(tn_id, "axb", "2").await.unwrap();

	let rows = adapter.list_overrides(tn_id, Some("a_")).await.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(&*rows[0].key, "a_b");
}

#[tokio::test]
async fn test_values_survive_reopen() {
	let temp_dir = TempDir::new().unwrap();
	let path = temp_dir.path().join("nested").join("tenconf.db");

	{
		let adapter = OverrideAdapterSqlite::new(&path).await.unwrap();
		adapter.upsert_override(TnId(1), "polling.overdue.time", "00:10:00").await.unwrap();
	}

	let adapter = OverrideAdapterSqlite::new(&path).await.unwrap();
	let row = adapter.read_override(TnId(1), "polling.overdue.time").await.unwrap().unwrap();
	assert_eq!(&*row.value, "00:10:00");
}

// vim: ts=4

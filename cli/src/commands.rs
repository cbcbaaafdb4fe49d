//! Command execution
//!
//! Every command opens the store, layers the global defaults (environment,
//! optional file, catalog) and verifies them before doing anything else.

use serde_json::{Value, json};
use std::sync::Arc;

use tenconf_core::settings::defaults::{
	DEFAULT_ENV_PREFIX, EnvDefaults, FileDefaults, LayeredDefaults, RegistryDefaults,
};
use tenconf_core::{SettingDefinition, SettingValue, TenantConfigManager};
use tenconf_override_adapter_sqlite::OverrideAdapterSqlite;
use tenconf_types::prelude::*;

use crate::{Cli, Commands};

const DB_FILE: &str = "tenconf.db";

async fn build_manager(cli: &Cli) -> ClResult<TenantConfigManager> {
	let registry = Arc::new(tenconf_core::default_registry()?);
	let store = Arc::new(OverrideAdapterSqlite::new(cli.db_dir.join(DB_FILE)).await?);

	let mut defaults =
		LayeredDefaults::new().with(Arc::new(EnvDefaults::from_env(DEFAULT_ENV_PREFIX)));
	if let Some(path) = &cli.defaults_file {
		defaults = defaults.with(Arc::new(FileDefaults::load(path)?));
	}
	let defaults = defaults.with(Arc::new(RegistryDefaults::new(registry.clone())));

	Ok(TenantConfigManager::new(registry, store, Arc::new(defaults)))
}

fn describe(def: &SettingDefinition) -> Value {
	json!({
		"key": def.key,
		"description": def.description,
		"type": def.value_type,
		"permission": def.permission,
		"default": def.default,
	})
}

/// Run the selected command, returning its JSON output
pub async fn run(cli: Cli) -> ClResult<String> {
	let manager = build_manager(&cli).await?;
	let checked = manager.verify_defaults().await?;

	let roles: Vec<&str> = cli.roles.iter().map(String::as_str).collect();
	let auth = Auth::new(TnId(cli.tenant), &cli.id_tag, &roles);
	debug!("Running as {} with roles {:?} in tenant {}", auth.id_tag, roles, auth.tn_id);

	let output = match &cli.command {
		Commands::Get { key } => {
			let value = manager.get_declared_value(&auth, key).await?;
			json!({ "key": key, "resolved": value })
		}
		Commands::GetGlobal { key } => {
			let value = manager.get_declared_global_value(&auth, key).await?;
			json!({ "key": key, "value": value })
		}
		Commands::Set { key, value } => {
			let stored = manager.add_or_update(&auth, key, SettingValue::String(value.clone())).await?;
			json!({ "key": key, "resolved": stored })
		}
		Commands::Delete { key } => {
			manager.delete(&auth, key).await?;
			let value = manager.get_declared_value(&auth, key).await?;
			json!({ "key": key, "resolved": value })
		}
		Commands::List { prefix } => {
			let values = manager.get_all_values(&auth).await?;
			let map: serde_json::Map<String, Value> = values
				.into_iter()
				.filter(|(key, _)| prefix.as_deref().is_none_or(|p| key.starts_with(p)))
				.map(|(key, value)| (key, json!(value)))
				.collect();
			Value::Object(map)
		}
		Commands::Keys { prefix } => {
			let registry = manager.registry();
			let defs: Vec<Value> = match prefix {
				Some(prefix) => registry.list_by_prefix(prefix).map(describe).collect(),
				None => registry.list().map(describe).collect(),
			};
			Value::Array(defs)
		}
		Commands::CheckDefaults => json!({ "checked": checked }),
	};

	Ok(format!("{:#}", output))
}

// vim: ts=4

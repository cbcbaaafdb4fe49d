//! Reusable test fixtures
//!
//! Managers wired to the built-in catalog and an in-memory override store,
//! plus caller contexts with the usual role combinations.

use std::sync::Arc;

use tenconf_core::settings::defaults::{DEFAULT_ENV_PREFIX, EnvDefaults, LayeredDefaults, RegistryDefaults};
use tenconf_core::{FrozenSettingsRegistry, TenantConfigManager};
use tenconf_types::auth::{Auth, ROLE_ADMIN, ROLE_TENANT_CONFIG};
use tenconf_types::defaults_provider::DefaultsProvider;
use tenconf_types::types::TnId;

use super::adapters::MemoryOverrideAdapter;

pub const TENANT_A: TnId = TnId(1);
pub const TENANT_B: TnId = TnId(2);

pub fn admin(tn_id: TnId) -> Auth {
	Auth::new(tn_id, "admin", &[ROLE_ADMIN])
}

pub fn config_user(tn_id: TnId) -> Auth {
	Auth::new(tn_id, "operator", &[ROLE_TENANT_CONFIG])
}

pub fn plain_user(tn_id: TnId) -> Auth {
	Auth::new(tn_id, "viewer", &["USER"])
}

pub struct TestEnv {
	pub manager: TenantConfigManager,
	pub store: Arc<MemoryOverrideAdapter>,
	pub registry: Arc<FrozenSettingsRegistry>,
}

pub fn test_registry() -> Arc<FrozenSettingsRegistry> {
	Arc::new(tenconf_core::default_registry().unwrap())
}

/// Manager whose global defaults are the catalog's embedded defaults
pub fn create_test_manager() -> TestEnv {
	let registry = test_registry();
	let defaults = Arc::new(RegistryDefaults::new(registry.clone()));
	create_test_manager_with(registry, defaults)
}

/// Manager with an environment layer in front of the catalog defaults
pub fn create_test_manager_with_env(vars: &[(&str, &str)]) -> TestEnv {
	let registry = test_registry();
	let defaults = LayeredDefaults::new()
		.with(Arc::new(EnvDefaults::from_vars(DEFAULT_ENV_PREFIX, vars.iter().copied())))
		.with(Arc::new(RegistryDefaults::new(registry.clone())));
	create_test_manager_with(registry, Arc::new(defaults))
}

pub fn create_test_manager_with(
	registry: Arc<FrozenSettingsRegistry>,
	defaults: Arc<dyn DefaultsProvider>,
) -> TestEnv {
	let store = Arc::new(MemoryOverrideAdapter::new());
	let manager = TenantConfigManager::new(registry.clone(), store.clone(), defaults);
	TestEnv { manager, store, registry }
}

// vim: ts=4

//! Tenant configuration core.
//!
//! Resolves the effective value of a configuration key for a tenant: the
//! tenant's override first, the global default second. Values are decoded to a
//! requested or declared type on the way out and validated against the key's
//! rules on the way in, so an invalid value is never persisted.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod prelude;
pub mod settings;

pub use settings::{
	ConfigValue, FromSettingValue, FrozenSettingsRegistry, PermissionLevel, SettingDefinition,
	SettingValue, SettingsRegistry, TenantConfigManager, ValueSource, ValueType,
};

/// Build and freeze a registry holding the built-in catalog
pub fn default_registry() -> tenconf_types::error::ClResult<FrozenSettingsRegistry> {
	let mut registry = SettingsRegistry::new();
	catalog::register_settings(&mut registry)?;
	Ok(registry.freeze())
}

// vim: ts=4

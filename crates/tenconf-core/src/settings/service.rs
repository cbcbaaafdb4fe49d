//! Tenant configuration manager: resolution, validation gate and permission checks

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use tenconf_types::defaults_provider::DefaultsProvider;
use tenconf_types::override_adapter::{OverrideAdapter, TenantConfiguration};

use crate::prelude::*;

use super::convert::{self, FromSettingValue};
use super::types::{FrozenSettingsRegistry, PermissionLevel, SettingDefinition, SettingValue};
use super::validate;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
	/// The tenant's own override
	Tenant,
	/// The system-wide default
	Global,
}

/// A resolved, typed configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValue<T> {
	pub value: T,
	pub source: ValueSource,
	/// Last modification of the override row, `None` for global values
	#[serde(skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<Timestamp>,
}

impl<T> ConfigValue<T> {
	pub fn is_global(&self) -> bool {
		self.source == ValueSource::Global
	}

}

/// Effective raw value before conversion
struct RawValue {
	raw: Box<str>,
	source: ValueSource,
	updated_at: Option<Timestamp>,
}

/// Tenant configuration manager - main interface for reading and writing
/// per-tenant configuration
///
/// Holds no mutable state of its own: the registry is frozen and the two
/// collaborators own their data, so one instance serves all requests.
#[derive(Debug)]
pub struct TenantConfigManager {
	registry: Arc<FrozenSettingsRegistry>,
	store: Arc<dyn OverrideAdapter>,
	defaults: Arc<dyn DefaultsProvider>,
}

impl TenantConfigManager {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn OverrideAdapter>,
		defaults: Arc<dyn DefaultsProvider>,
	) -> Self {
		Self { registry, store, defaults }
	}

	/// Get reference to registry (for listing all settings)
	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	fn check_read(&self, auth: &Auth, key: &str) -> ClResult<()> {
		if auth.can_read_config() {
			Ok(())
		} else {
			warn!("Read of '{}' denied for {} in tenant {}", key, auth.id_tag, auth.tn_id);
			Err(Error::PermissionDenied)
		}
	}

	fn check_write(&self, auth: &Auth, def: &SettingDefinition) -> ClResult<()> {
		if def.permission.check(&auth.roles) {
			Ok(())
		} else {
			warn!(
				"Write of '{}' denied for {} in tenant {}: requires {:?}",
				def.key, auth.id_tag, auth.tn_id, def.permission
			);
			Err(Error::PermissionDenied)
		}
	}

	/// Read the tenant row unless the key can never be overridden
	async fn read_row(
		&self,
		auth: &Auth,
		def: &SettingDefinition,
	) -> ClResult<Option<TenantConfiguration>> {
		if def.permission == PermissionLevel::System {
			return Ok(None);
		}
		self.store.read_override(auth.tn_id, &def.key).await
	}

	/// Tenant row if present, else global default, else nothing
	async fn effective_raw(
		&self,
		def: &SettingDefinition,
		row: Option<&TenantConfiguration>,
	) -> ClResult<Option<RawValue>> {
		if let Some(row) = row {
			debug!("Setting '{}' resolved from tenant {} override", def.key, row.tn_id);
			return Ok(Some(RawValue {
				raw: row.value.clone(),
				source: ValueSource::Tenant,
				updated_at: Some(row.updated_at),
			}));
		}

		match self.defaults.read_default(&def.key).await? {
			Some(raw) => {
				debug!("Setting '{}' resolved from global default", def.key);
				Ok(Some(RawValue { raw, source: ValueSource::Global, updated_at: None }))
			}
			None => {
				debug!("Setting '{}' has no override and no default", def.key);
				Ok(None)
			}
		}
	}

	/// Shared read path: resolve, then decode with the given decoder
	async fn resolve<T>(
		&self,
		def: &SettingDefinition,
		row: Option<&TenantConfiguration>,
		decode: impl FnOnce(&str, &str) -> ClResult<T>,
	) -> ClResult<Option<ConfigValue<T>>> {
		let Some(raw) = self.effective_raw(def, row).await? else {
			return Ok(None);
		};
		let value = decode(def.key.as_str(), raw.raw.as_ref())?;
		Ok(Some(ConfigValue { value, source: raw.source, updated_at: raw.updated_at }))
	}

	/// Get the effective value of `key` for the caller's tenant as `T`
	///
	/// Returns `Ok(None)` when neither an override nor a global default exists.
	/// Values are not re-validated here; the write path already did.
	pub async fn get_value<T: FromSettingValue>(
		&self,
		auth: &Auth,
		key: &str,
	) -> ClResult<Option<ConfigValue<T>>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		let row = self.read_row(auth, def).await?;
		self.resolve(def, row.as_ref(), |key, raw| {
			convert::decode_as::<T>(key, raw, def.value_type)
		})
		.await
	}

	/// Get the effective value of `key`, decoded to its declared type
	pub async fn get_declared_value(
		&self,
		auth: &Auth,
		key: &str,
	) -> ClResult<Option<ConfigValue<SettingValue>>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		let row = self.read_row(auth, def).await?;
		self.resolve(def, row.as_ref(), |key, raw| convert::decode(key, raw, def.value_type))
			.await
	}

	/// Get the global default of `key` as `T`, ignoring any tenant override
	pub async fn get_global_value<T: FromSettingValue>(
		&self,
		auth: &Auth,
		key: &str,
	) -> ClResult<Option<T>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		match self.defaults.read_default(&def.key).await? {
			Some(raw) => convert::decode_as::<T>(&def.key, &raw, def.value_type).map(Some),
			None => Ok(None),
		}
	}

	/// Get the global default of `key`, decoded to its declared type
	pub async fn get_declared_global_value(
		&self,
		auth: &Auth,
		key: &str,
	) -> ClResult<Option<SettingValue>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		match self.defaults.read_default(&def.key).await? {
			Some(raw) => convert::decode(&def.key, &raw, def.value_type).map(Some),
			None => Ok(None),
		}
	}

	/// Interpret an already fetched override row for `key`
	///
	/// `row` is `None` when the tenant has no override. Only the defaults source
	/// is consulted; the override store is never touched, so callers can fetch
	/// once and interpret many keys.
	pub async fn build_value_by_key<T: FromSettingValue>(
		&self,
		auth: &Auth,
		key: &str,
		row: Option<&TenantConfiguration>,
	) -> ClResult<Option<ConfigValue<T>>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		let row = self.check_row(auth, def, row)?;
		self.resolve(def, row, |key, raw| convert::decode_as::<T>(key, raw, def.value_type))
			.await
	}

	/// Same as `build_value_by_key`, decoding to the declared type
	pub async fn build_declared_value_by_key(
		&self,
		auth: &Auth,
		key: &str,
		row: Option<&TenantConfiguration>,
	) -> ClResult<Option<ConfigValue<SettingValue>>> {
		self.check_read(auth, key)?;
		let def = self.registry.describe(key)?;
		let row = self.check_row(auth, def, row)?;
		self.resolve(def, row, |key, raw| convert::decode(key, raw, def.value_type)).await
	}

	/// A caller-supplied row must belong to the caller's tenant and the key
	fn check_row<'a>(
		&self,
		auth: &Auth,
		def: &SettingDefinition,
		row: Option<&'a TenantConfiguration>,
	) -> ClResult<Option<&'a TenantConfiguration>> {
		let Some(row) = row else {
			return Ok(None);
		};
		if row.tn_id != auth.tn_id {
			warn!(
				"Row of tenant {} passed for '{}' by {} in tenant {}",
				row.tn_id, def.key, auth.id_tag, auth.tn_id
			);
			return Err(Error::PermissionDenied);
		}
		if *row.key != *def.key {
			return Err(Error::ConfigError(format!(
				"Row for '{}' passed when building '{}'",
				row.key, def.key
			)));
		}
		if def.permission == PermissionLevel::System {
			return Ok(None);
		}
		Ok(Some(row))
	}

	/// Validate and persist an override for the caller's tenant
	///
	/// Values of a different variant are brought to the declared type first
	/// (`"00:05:00"` for a duration key); if that fails the write is rejected as
	/// a validation error. Nothing is written unless validation passes.
	pub async fn add_or_update<V: Into<SettingValue>>(
		&self,
		auth: &Auth,
		key: &str,
		value: V,
	) -> ClResult<ConfigValue<SettingValue>> {
		let def = self.registry.describe(key)?;
		self.check_write(auth, def)?;

		let value = value.into();
		let value = match convert::coerce(&def.key, value.clone(), def.value_type) {
			Ok(value) => value,
			Err(_) => {
				let err = Error::validation(
					def.key.as_str(),
					convert::encode(&value),
					format!("expected {} value, got {}", def.value_type, value.type_name()),
				);
				warn!("Rejected write of '{}' in tenant {}: {}", key, auth.tn_id, err);
				return Err(err);
			}
		};

		if let Err(err) = validate::validate(def, &value) {
			warn!("Rejected write of '{}' in tenant {}: {}", key, auth.tn_id, err);
			return Err(err);
		}

		let raw = convert::encode(&value);
		let row = self.store.upsert_override(auth.tn_id, &def.key, &raw).await?;

		info!("Setting '{}' updated for tn_id={} by {}", key, auth.tn_id, auth.id_tag);

		Ok(ConfigValue { value, source: ValueSource::Tenant, updated_at: Some(row.updated_at) })
	}

	/// Remove the caller's override for `key`. A missing override is a no-op.
	pub async fn delete(&self, auth: &Auth, key: &str) -> ClResult<()> {
		let def = self.registry.describe(key)?;
		self.check_write(auth, def)?;

		if self.store.delete_override(auth.tn_id, &def.key).await? {
			info!("Setting '{}' deleted for tn_id={} by {}", key, auth.tn_id, auth.id_tag);
		} else {
			debug!("Setting '{}' has no override for tn_id={}, nothing to delete", key, auth.tn_id);
		}
		Ok(())
	}

	/// Effective values of every registered key for the caller's tenant
	///
	/// One store round-trip for all override rows, then per-key interpretation.
	/// Keys without any value are left out.
	pub async fn get_all_values(
		&self,
		auth: &Auth,
	) -> ClResult<Vec<(String, ConfigValue<SettingValue>)>> {
		if !auth.can_read_config() {
			warn!("Listing denied for {} in tenant {}", auth.id_tag, auth.tn_id);
			return Err(Error::PermissionDenied);
		}

		let mut rows: HashMap<Box<str>, TenantConfiguration> = self
			.store
			.list_overrides(auth.tn_id, None)
			.await?
			.into_iter()
			.map(|row| (row.key.clone(), row))
			.collect();

		let mut values = Vec::new();
		for def in self.registry.list() {
			let row = rows.remove(def.key.as_str());
			if let Some(value) =
				self.build_declared_value_by_key(auth, &def.key, row.as_ref()).await?
			{
				values.push((def.key.clone(), value));
			}
		}

		for key in rows.keys() {
			warn!("Ignoring override of unregistered key '{}' in tenant {}", key, auth.tn_id);
		}

		Ok(values)
	}

	/// Check every global default against its key definition
	///
	/// Defaults are trusted on the read path, so a broken one has to be caught
	/// here, at startup. Returns the number of defaults checked.
	pub async fn verify_defaults(&self) -> ClResult<usize> {
		let mut checked = 0;
		for def in self.registry.list() {
			let Some(raw) = self.defaults.read_default(&def.key).await? else {
				continue;
			};
			convert::decode(&def.key, &raw, def.value_type)
				.and_then(|value| validate::validate(def, &value))
				.map_err(|err| {
					error!("Global default of '{}' is invalid: {}", def.key, err);
					Error::ConfigError(format!("Invalid global default for '{}': {}", def.key, err))
				})?;
			checked += 1;
		}
		info!("Verified {} global default(s)", checked);
		Ok(checked)
	}
}

// vim: ts=4

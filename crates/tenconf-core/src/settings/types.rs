//! Settings types and definitions
//!
//! Core types for the configuration subsystem: the closed set of value types,
//! key definitions, and the registry that maps keys to their definitions.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use tenconf_types::auth;

use crate::prelude::*;

use super::{convert, defaults, validate};

/// Type alias for setting validator function
///
/// Returns a description of the violated constraint on rejection. The caller
/// wraps it into an `Error::ValidationError` carrying the key and the value.
pub type SettingValidator = Box<dyn Fn(&SettingValue) -> Result<(), String> + Send + Sync>;

/// Declared value type of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Bool,
	Int,
	String,
	/// Whole-second duration, encoded as `HH:MM:SS`
	Duration,
	/// Composite value, encoded as compact JSON
	Json,
}

impl ValueType {
	pub fn name(self) -> &'static str {
		match self {
			ValueType::Bool => "bool",
			ValueType::Int => "int",
			ValueType::String => "string",
			ValueType::Duration => "duration",
			ValueType::Json => "json",
		}
	}
}

impl std::fmt::Display for ValueType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Setting value types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
	Bool(bool),
	Int(i64),
	String(String),
	#[serde(serialize_with = "serialize_duration")]
	Duration(Duration),
	Json(serde_json::Value),
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(&convert::format_duration(*value))
}

impl SettingValue {
	pub fn value_type(&self) -> ValueType {
		match self {
			SettingValue::Bool(_) => ValueType::Bool,
			SettingValue::Int(_) => ValueType::Int,
			SettingValue::String(_) => ValueType::String,
			SettingValue::Duration(_) => ValueType::Duration,
			SettingValue::Json(_) => ValueType::Json,
		}
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		self.value_type().name()
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		SettingValue::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		SettingValue::Int(value)
	}
}

impl From<i32> for SettingValue {
	fn from(value: i32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<u32> for SettingValue {
	fn from(value: u32) -> Self {
		SettingValue::Int(i64::from(value))
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		SettingValue::String(value)
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		SettingValue::String(value.to_string())
	}
}

impl From<Duration> for SettingValue {
	fn from(value: Duration) -> Self {
		SettingValue::Duration(value)
	}
}

impl From<serde_json::Value> for SettingValue {
	fn from(value: serde_json::Value) -> Self {
		SettingValue::Json(value)
	}
}

/// Setting permission level defines who can override a setting per tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
	/// System: only the global default applies, never overridable
	System,
	/// Admin: only users with admin role can change
	Admin,
	/// User: tenant configuration role or admin role
	User,
}

impl PermissionLevel {
	/// Check if the given roles satisfy this permission level
	pub fn check<S: AsRef<str>>(&self, roles: &[S]) -> bool {
		match self {
			PermissionLevel::System => false, // Never changeable
			PermissionLevel::Admin => roles.iter().any(|r| r.as_ref() == auth::ROLE_ADMIN),
			PermissionLevel::User => roles
				.iter()
				.any(|r| r.as_ref() == auth::ROLE_TENANT_CONFIG || r.as_ref() == auth::ROLE_ADMIN),
		}
	}
}

/// Setting definition - defines metadata for each configuration key
pub struct SettingDefinition {
	/// Dot-separated key (e.g., "polling.time")
	pub key: String,

	/// Human-readable description
	pub description: String,

	/// Declared type; reads without an explicit target decode to it
	pub value_type: ValueType,

	/// Default embedded in the catalog, already checked against the validator
	pub default: Option<SettingValue>,

	/// Permission level required to override this setting
	pub permission: PermissionLevel,

	/// Optional validation function
	pub validator: Option<SettingValidator>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("description", &self.description)
			.field("value_type", &self.value_type)
			.field("default", &self.default)
			.field("permission", &self.permission)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	value_type: Option<ValueType>,
	default: Option<SettingValue>,
	permission: PermissionLevel,
	validator: Option<SettingValidator>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			description: None,
			value_type: None,
			default: None,
			permission: PermissionLevel::User,
			validator: None,
		}
	}

	/// Set the description (required)
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Declare the value type. May be omitted when a default is given.
	pub fn value_type(mut self, value_type: ValueType) -> Self {
		self.value_type = Some(value_type);
		self
	}

	/// Set the default value
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Set the permission level (defaults to User)
	pub fn permission(mut self, permission: PermissionLevel) -> Self {
		self.permission = permission;
		self
	}

	/// Set a validation function
	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(f));
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> ClResult<SettingDefinition> {
		let description = self.description.ok_or_else(|| {
			Error::ConfigError(format!("Setting '{}' has no description", self.key))
		})?;

		let value_type = self
			.value_type
			.or_else(|| self.default.as_ref().map(SettingValue::value_type))
			.ok_or_else(|| {
				Error::ConfigError(format!(
					"Setting '{}' needs a value type or a default",
					self.key
				))
			})?;

		if self.permission == PermissionLevel::System && self.default.is_none() {
			tracing::warn!(
				"Setting '{}' is read-only but has no embedded default - it relies on the defaults source",
				self.key
			);
		}

		let mut def = SettingDefinition {
			key: self.key,
			description,
			value_type,
			default: None,
			permission: self.permission,
			validator: self.validator,
		};

		// The embedded default goes through the same gate as a tenant write
		if let Some(default) = self.default {
			let default = convert::coerce(&def.key, default, value_type)
				.and_then(|value| validate::validate(&def, &value).map(|()| value))
				.map_err(|err| {
					Error::ConfigError(format!("Invalid default for '{}': {}", def.key, err))
				})?;
			def.default = Some(default);
		}

		Ok(def)
	}
}

/// Mutable registry used during initialization
pub struct SettingsRegistry {
	definitions: BTreeMap<String, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: BTreeMap::new() }
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> ClResult<()> {
		if self.definitions.contains_key(&def.key) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		let suffix = defaults::env_suffix(&def.key);
		if let Some(other) =
			self.definitions.keys().find(|key| defaults::env_suffix(key) == suffix)
		{
			return Err(Error::ConfigError(format!(
				"Setting '{}' maps to the same environment variable as '{}'",
				def.key, other
			)));
		}

		tracing::debug!("Registering setting: {}", def.key);
		self.definitions.insert(def.key.clone(), def);
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		tracing::info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	/// Get number of registered settings
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Check if registry is empty
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable registry shared by all requests, no locking needed
pub struct FrozenSettingsRegistry {
	definitions: BTreeMap<String, SettingDefinition>,
}

impl FrozenSettingsRegistry {
	/// Get a setting definition by key
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.definitions.get(key)
	}

	/// Get a setting definition, failing loudly on unregistered keys
	pub fn describe(&self, key: &str) -> ClResult<&SettingDefinition> {
		self.definitions.get(key).ok_or_else(|| Error::UnknownKey(key.into()))
	}

	/// List all registered settings, ordered by key
	pub fn list(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.values()
	}

	/// List settings with a specific prefix
	pub fn list_by_prefix<'a>(
		&'a self,
		prefix: &'a str,
	) -> Box<dyn Iterator<Item = &'a SettingDefinition> + 'a> {
		Box::new(self.definitions.values().filter(move |def| def.key.starts_with(prefix)))
	}

	/// Get number of registered settings
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Check if registry is empty
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Debug for FrozenSettingsRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FrozenSettingsRegistry").field("len", &self.definitions.len()).finish()
	}
}


// vim: ts=4

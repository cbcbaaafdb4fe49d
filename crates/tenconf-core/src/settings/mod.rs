//! Tenant configuration subsystem
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): value types, key definitions and the registry
//! - **Convert** (`convert.rs`): raw string <-> typed value conversion
//! - **Validate** (`validate.rs`): write-path gate and reusable validators
//! - **Defaults** (`defaults.rs`): global default sources (registry, env, file)
//! - **Service** (`service.rs`): `TenantConfigManager`, the resolution pipeline
//!
//! # Resolution
//!
//! Reads consult the tenant's override row first and fall back to the global
//! default. Absence at both levels yields `Ok(None)`. Writes are validated
//! before they reach the store.

pub mod convert;
pub mod defaults;
pub mod service;
pub mod types;
pub mod validate;

pub use convert::FromSettingValue;
pub use service::{ConfigValue, TenantConfigManager, ValueSource};
pub use types::{
	FrozenSettingsRegistry, PermissionLevel, SettingDefinition, SettingDefinitionBuilder,
	SettingValidator, SettingValue, SettingsRegistry, ValueType,
};

// vim: ts=4

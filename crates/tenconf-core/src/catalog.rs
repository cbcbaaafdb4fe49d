//! Built-in configuration keys
//!
//! Registers the device-management keys every deployment knows about. Defaults
//! here are the fallback of last resort; deployments usually override them
//! through the environment or a defaults file.

use std::time::Duration;

use crate::prelude::*;
use crate::settings::validate::{
	duration_range, int_range, json_string_set, non_empty, pattern, positive_int,
};
use crate::settings::{PermissionLevel, SettingDefinition, SettingsRegistry, ValueType};

/// Action states that may be removed by the cleanup job
pub const CLEANUP_ACTION_STATES: &[&str] = &["CANCELED", "ERROR", "FINISHED"];

/// Register all built-in settings
pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	// Polling
	//*********
	registry.register(
		SettingDefinition::builder("polling.time")
			.description("Interval in seconds between two device polls")
			.default(30_i64)
			.validator(positive_int())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("polling.overdue.time")
			.description("Time after the polling interval before a device counts as overdue")
			.value_type(ValueType::Duration)
			.default("00:05:00")
			.validator(duration_range(Duration::from_secs(1), Duration::from_secs(24 * 3600 - 1)))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("maintenanceWindowPollCount")
			.description("Number of polls within a maintenance window")
			.default(3_i64)
			.validator(int_range(1, 100))
			.build()?,
	)?;

	// Authentication
	//****************
	registry.register(
		SettingDefinition::builder("authentication.header.enabled")
			.description("Authenticate devices through a reverse-proxy provided header")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("authentication.header.authority")
			.description("Issuer name expected in the authentication header")
			.value_type(ValueType::String)
			.validator(non_empty())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("authentication.targettoken.enabled")
			.description("Authenticate devices with their own security token")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("authentication.gatewaytoken.enabled")
			.description("Authenticate devices with the shared gateway token")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("authentication.gatewaytoken.key")
			.description("Shared gateway security token")
			.value_type(ValueType::String)
			// Credential, only tenant administrators may set it
			.permission(PermissionLevel::Admin)
			.validator(pattern("^[A-Za-z0-9]{16,128}$")?)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("anonymous.download.enabled")
			.description("Allow artifact downloads without authentication")
			.default(false)
			.build()?,
	)?;

	// Rollouts and actions
	//**********************
	registry.register(
		SettingDefinition::builder("repository.actions.autoclose.enabled")
			.description("Close a running action when a newer one is assigned")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("rollout.approval.enabled")
			.description("Rollouts need approval before they can start")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("multi.assignments.enabled")
			.description("Allow several parallel assignments per device")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("user.confirmation.flow.enabled")
			.description("Require user confirmation on the device before installing")
			.default(false)
			.build()?,
	)?;

	// Action cleanup
	//****************
	registry.register(
		SettingDefinition::builder("action.cleanup.enabled")
			.description("Periodically remove old actions")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("action.cleanup.actionExpiry")
			.description("Age in milliseconds after which an action may be removed")
			.default(30_i64 * 24 * 3600 * 1000)
			.validator(positive_int())
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("action.cleanup.actionStatus")
			.description("Action states eligible for cleanup")
			.default(serde_json::json!(["CANCELED", "ERROR"]))
			.validator(json_string_set(CLEANUP_ACTION_STATES))
			.build()?,
	)?;

	// Instance
	//**********
	registry.register(
		SettingDefinition::builder("server.instance.name")
			.description("Name of this server instance, fixed at deployment")
			.default("default")
			.permission(PermissionLevel::System)
			.validator(non_empty())
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4

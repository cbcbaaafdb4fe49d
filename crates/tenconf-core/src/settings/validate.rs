//! Write-path validation and reusable validators
//!
//! Validators are stateless closures attached to a key definition. They see an
//! already type-coerced value and report the violated constraint as text;
//! `validate` turns that into a structured `Error::ValidationError`.

use regex::Regex;
use std::time::Duration;

use crate::prelude::*;

use super::convert;
use super::types::{SettingDefinition, SettingValue};

/// Check a candidate value against its key definition
pub fn validate(def: &SettingDefinition, value: &SettingValue) -> ClResult<()> {
	let reject =
		|constraint: String| Error::validation(def.key.as_str(), convert::encode(value), constraint);

	if value.value_type() != def.value_type {
		return Err(reject(format!(
			"expected {} value, got {}",
			def.value_type,
			value.type_name()
		)));
	}

	// Sub-second durations would not survive the HH:MM:SS encoding
	if let SettingValue::Duration(d) = value
		&& d.subsec_nanos() != 0
	{
		return Err(reject("duration must be a whole number of seconds".into()));
	}

	if let Some(validator) = &def.validator {
		validator(value).map_err(reject)?;
	}

	Ok(())
}

pub fn positive_int() -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	|value: &SettingValue| match value {
		SettingValue::Int(i) if *i > 0 => Ok(()),
		SettingValue::Int(_) => Err("must be a positive integer".into()),
		other => Err(format!("expected int, got {}", other.type_name())),
	}
}

/// Inclusive integer range
pub fn int_range(
	min: i64,
	max: i64,
) -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	move |value: &SettingValue| match value {
		SettingValue::Int(i) if (min..=max).contains(i) => Ok(()),
		SettingValue::Int(_) => Err(format!("must be between {} and {}", min, max)),
		other => Err(format!("expected int, got {}", other.type_name())),
	}
}

pub fn non_empty() -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	|value: &SettingValue| match value {
		SettingValue::String(s) if !s.trim().is_empty() => Ok(()),
		SettingValue::String(_) => Err("must not be empty".into()),
		other => Err(format!("expected string, got {}", other.type_name())),
	}
}

/// String matching a regular expression (anchor it yourself)
pub fn pattern(
	re: &str,
) -> ClResult<impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static> {
	let regex = Regex::new(re)
		.map_err(|err| Error::ConfigError(format!("Invalid validator pattern '{}': {}", re, err)))?;

	Ok(move |value: &SettingValue| match value {
		SettingValue::String(s) if regex.is_match(s) => Ok(()),
		SettingValue::String(_) => Err(format!("must match pattern '{}'", regex.as_str())),
		other => Err(format!("expected string, got {}", other.type_name())),
	})
}

/// String that is one of a fixed set of options
pub fn one_of(
	options: &[&str],
) -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	let options: Vec<String> = options.iter().map(|o| (*o).to_string()).collect();
	move |value: &SettingValue| match value {
		SettingValue::String(s) if options.contains(s) => Ok(()),
		SettingValue::String(_) => Err(format!("must be one of: {}", options.join(", "))),
		other => Err(format!("expected string, got {}", other.type_name())),
	}
}

/// Inclusive duration range
pub fn duration_range(
	min: Duration,
	max: Duration,
) -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	move |value: &SettingValue| match value {
		SettingValue::Duration(d) if (min..=max).contains(d) => Ok(()),
		SettingValue::Duration(_) => Err(format!(
			"must be between {} and {}",
			convert::format_duration(min),
			convert::format_duration(max)
		)),
		other => Err(format!("expected duration, got {}", other.type_name())),
	}
}

/// JSON array of distinct strings, each taken from `allowed`
pub fn json_string_set(
	allowed: &[&str],
) -> impl Fn(&SettingValue) -> Result<(), String> + Send + Sync + 'static {
	let allowed: Vec<String> = allowed.iter().map(|o| (*o).to_string()).collect();
	move |value: &SettingValue| {
		let SettingValue::Json(serde_json::Value::Array(items)) = value else {
			return Err("expected a JSON array of strings".into());
		};

		let mut seen: Vec<&str> = Vec::with_capacity(items.len());
		for item in items {
			let Some(s) = item.as_str() else {
				return Err("expected a JSON array of strings".into());
			};
			if !allowed.iter().any(|a| a == s) {
				return Err(format!(
					"'{}' is not allowed, expected any of: {}",
					s,
					allowed.join(", ")
				));
			}
			if seen.contains(&s) {
				return Err(format!("'{}' is listed more than once", s));
			}
			seen.push(s);
		}
		Ok(())
	}
}


// vim: ts=4

//! Raw value conversion
//!
//! Stored overrides and global defaults are plain strings. A closed set of
//! decoders, selected by `ValueType`, turns them into typed values:
//!
//! | type       | raw form                         |
//! |------------|----------------------------------|
//! | `bool`     | `true` / `false` (any case)      |
//! | `int`      | decimal `i64`                    |
//! | `string`   | the raw text itself              |
//! | `duration` | `HH:MM:SS`, minutes/seconds < 60 |
//! | `json`     | any JSON document                |
//!
//! Decoding never substitutes a default: malformed input is a
//! `ConversionError` naming the key, the target type and the raw value.

use std::time::Duration;

use crate::prelude::*;

use super::types::{SettingValue, ValueType};

/// Format a duration as `HH:MM:SS`. Sub-second precision is dropped.
pub fn format_duration(value: Duration) -> String {
	let secs = value.as_secs();
	format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Parse `HH:MM:SS`. Hours may exceed two digits.
pub fn parse_duration(raw: &str) -> Option<Duration> {
	let mut parts = raw.split(':');
	let (hours, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
	if parts.next().is_some() {
		return None;
	}

	let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
	if !digits(hours) || !digits(minutes) || !digits(seconds) {
		return None;
	}
	if minutes.len() != 2 || seconds.len() != 2 {
		return None;
	}

	let hours: u64 = hours.parse().ok()?;
	let minutes: u64 = minutes.parse().ok()?;
	let seconds: u64 = seconds.parse().ok()?;
	if minutes >= 60 || seconds >= 60 {
		return None;
	}

	let total = hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)?;
	Some(Duration::from_secs(total))
}

/// Decode a raw value to the given type
pub fn decode(key: &str, raw: &str, target: ValueType) -> ClResult<SettingValue> {
	let fail = || Error::conversion(key, target.name(), raw);

	match target {
		ValueType::Bool => {
			let trimmed = raw.trim();
			if trimmed.eq_ignore_ascii_case("true") {
				Ok(SettingValue::Bool(true))
			} else if trimmed.eq_ignore_ascii_case("false") {
				Ok(SettingValue::Bool(false))
			} else {
				Err(fail())
			}
		}
		ValueType::Int => raw.trim().parse::<i64>().map(SettingValue::Int).map_err(|_| fail()),
		ValueType::String => Ok(SettingValue::String(raw.to_string())),
		ValueType::Duration => {
			parse_duration(raw.trim()).map(SettingValue::Duration).ok_or_else(fail)
		}
		ValueType::Json => serde_json::from_str::<serde_json::Value>(raw)
			.map(SettingValue::Json)
			.map_err(|_| fail()),
	}
}

/// Encode a typed value into its raw form for persistence
pub fn encode(value: &SettingValue) -> String {
	match value {
		SettingValue::Bool(b) => b.to_string(),
		SettingValue::Int(i) => i.to_string(),
		SettingValue::String(s) => s.clone(),
		SettingValue::Duration(d) => format_duration(*d),
		SettingValue::Json(j) => j.to_string(),
	}
}

/// Bring a value to the target type, passing through the raw encoding when
/// the variants differ (e.g. `"00:05:00"` given for a duration key).
pub fn coerce(key: &str, value: SettingValue, target: ValueType) -> ClResult<SettingValue> {
	if value.value_type() == target {
		return Ok(value);
	}
	decode(key, &encode(&value), target)
}

/// Rust types a configuration value can be read as
///
/// `VALUE_TYPE` is the declared type `T` reads; `from_setting_value` narrows the decoded
/// value and returns `None` when it does not fit (e.g. an `i64` outside `i32`).
pub trait FromSettingValue: Sized {
	const VALUE_TYPE: ValueType;
	const TYPE_NAME: &'static str;

	fn from_setting_value(value: SettingValue) -> Option<Self>;
}

/// Decode a raw value of a key declared as `declared` into `T`
///
/// `T` has to read the declared type: an `int` key is never handed out as a
/// string or a JSON number, even though both decoders would accept the text.
pub fn decode_as<T: FromSettingValue>(
	key: &str,
	raw: &str,
	declared: ValueType,
) -> ClResult<T> {
	let fail = || Error::conversion(key, T::TYPE_NAME, raw);
	if T::VALUE_TYPE != declared {
		return Err(fail());
	}
	let value = decode(key, raw, declared).map_err(|_| fail())?;
	T::from_setting_value(value).ok_or_else(fail)
}

impl FromSettingValue for bool {
	const VALUE_TYPE: ValueType = ValueType::Bool;
	const TYPE_NAME: &'static str = "bool";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Bool(b) => Some(b),
			_ => None,
		}
	}
}

impl FromSettingValue for i64 {
	const VALUE_TYPE: ValueType = ValueType::Int;
	const TYPE_NAME: &'static str = "i64";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Int(i) => Some(i),
			_ => None,
		}
	}
}

impl FromSettingValue for i32 {
	const VALUE_TYPE: ValueType = ValueType::Int;
	const TYPE_NAME: &'static str = "i32";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Int(i) => i32::try_from(i).ok(),
			_ => None,
		}
	}
}

impl FromSettingValue for u32 {
	const VALUE_TYPE: ValueType = ValueType::Int;
	const TYPE_NAME: &'static str = "u32";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Int(i) => u32::try_from(i).ok(),
			_ => None,
		}
	}
}

impl FromSettingValue for String {
	const VALUE_TYPE: ValueType = ValueType::String;
	const TYPE_NAME: &'static str = "string";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}
}

impl FromSettingValue for Duration {
	const VALUE_TYPE: ValueType = ValueType::Duration;
	const TYPE_NAME: &'static str = "duration";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Duration(d) => Some(d),
			_ => None,
		}
	}
}

impl FromSettingValue for serde_json::Value {
	const VALUE_TYPE: ValueType = ValueType::Json;
	const TYPE_NAME: &'static str = "json";

	fn from_setting_value(value: SettingValue) -> Option<Self> {
		match value {
			SettingValue::Json(j) => Some(j),
			_ => None,
		}
	}
}


// vim: ts=4

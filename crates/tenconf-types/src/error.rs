//! Error types for tenant configuration resolution
//!
//! Absence of a value is never an error: read paths return `Ok(None)` for it.
//! Everything here means that either the call itself was wrong, the stored or
//! default data is broken, or a collaborator failed.

use std::fmt;

pub type ClResult<T> = std::result::Result<T, Error>;

/// A candidate value rejected on the write path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
	pub key: Box<str>,
	/// Encoded form of the offending value
	pub value: String,
	/// Human-readable description of the violated constraint
	pub constraint: String,
}

/// A raw value that could not be decoded to the requested type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
	pub key: Box<str>,
	pub expected: &'static str,
	pub raw: String,
}

#[derive(Debug)]
pub enum Error {
	/// Key is not present in the registry
	UnknownKey(Box<str>),
	ValidationError(ValidationFailure),
	ConversionError(ConversionFailure),
	PermissionDenied,
	/// Registry or defaults misconfiguration, detected at startup
	ConfigError(String),

	// collaborators
	DbError,
	Io(std::io::Error),
	ServiceUnavailable(String),
}

impl Error {
	pub fn validation(
		key: impl Into<Box<str>>,
		value: impl Into<String>,
		constraint: impl Into<String>,
	) -> Self {
		Error::ValidationError(ValidationFailure {
			key: key.into(),
			value: value.into(),
			constraint: constraint.into(),
		})
	}

	pub fn conversion(
		key: impl Into<Box<str>>,
		expected: &'static str,
		raw: impl Into<String>,
	) -> Self {
		Error::ConversionError(ConversionFailure {
			key: key.into(),
			expected,
			raw: raw.into(),
		})
	}

	/// True for failures raised by the override store or the defaults source
	pub fn is_collaborator(&self) -> bool {
		matches!(self, Error::DbError | Error::Io(_) | Error::ServiceUnavailable(_))
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::UnknownKey(key) => write!(f, "unknown configuration key '{}'", key),
			Error::ValidationError(v) => write!(
				f,
				"invalid value '{}' for configuration key '{}': {}",
				v.value, v.key, v.constraint
			),
			Error::ConversionError(c) => write!(
				f,
				"cannot convert value '{}' of configuration key '{}' to {}",
				c.raw, c.key, c.expected
			),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Io(err) => write!(f, "I/O error: {}", err),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_message_names_key_value_and_constraint() {
		let err = Error::validation("polling.time", "-5", "must be a positive integer");
		let msg = err.to_string();
		assert!(msg.contains("polling.time"));
		assert!(msg.contains("-5"));
		assert!(msg.contains("positive"));
		assert!(!err.is_collaborator());
	}

	#[test]
	fn test_conversion_message() {
		let err = Error::conversion("polling.time", "bool", "60");
		assert_eq!(
			err.to_string(),
			"cannot convert value '60' of configuration key 'polling.time' to bool"
		);
	}

	#[test]
	fn test_collaborator_classification() {
		assert!(Error::DbError.is_collaborator());
		assert!(Error::ServiceUnavailable("down".into()).is_collaborator());
		assert!(Error::from(std::io::Error::other("disk")).is_collaborator());
		assert!(!Error::UnknownKey("x".into()).is_collaborator());
		assert!(!Error::PermissionDenied.is_collaborator());
	}
}

// vim: ts=4

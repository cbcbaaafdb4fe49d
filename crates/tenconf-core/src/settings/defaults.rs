//! Global default sources
//!
//! Every source answers the same question, "what is the system-wide raw value
//! of this key", so the manager does not care where defaults live:
//!
//! - `RegistryDefaults`: the default embedded in the key definition
//! - `EnvDefaults`: environment variables (`polling.time` -> `TENCONF_POLLING_TIME`)
//! - `FileDefaults`: a YAML properties file
//! - `LayeredDefaults`: first hit of an ordered list of sources
//!
//! Environment and file sources are read once at construction, so repeated
//! lookups return the same answer for the lifetime of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tenconf_types::defaults_provider::DefaultsProvider;

use crate::prelude::*;

use super::convert;
use super::types::FrozenSettingsRegistry;

pub const DEFAULT_ENV_PREFIX: &str = "TENCONF_";

// RegistryDefaults //
//******************//
#[derive(Debug)]
pub struct RegistryDefaults {
	registry: Arc<FrozenSettingsRegistry>,
}

impl RegistryDefaults {
	pub fn new(registry: Arc<FrozenSettingsRegistry>) -> Self {
		Self { registry }
	}
}

#[async_trait]
impl DefaultsProvider for RegistryDefaults {
	async fn read_default(&self, key: &str) -> ClResult<Option<Box<str>>> {
		Ok(self
			.registry
			.get(key)
			.and_then(|def| def.default.as_ref())
			.map(|value| convert::encode(value).into_boxed_str()))
	}
}

// EnvDefaults //
//*************//
#[derive(Debug, Default)]
pub struct EnvDefaults {
	prefix: String,
	vars: HashMap<String, String>,
}

impl EnvDefaults {
	/// Snapshot the process environment
	pub fn from_env(prefix: &str) -> Self {
		Self::from_vars(prefix, std::env::vars())
	}

	/// Build from an explicit set of variables, keeping only prefixed ones
	pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let vars: HashMap<String, String> = vars
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.filter(|(k, _)| k.starts_with(prefix))
			.collect();
		debug!("Loaded {} default(s) from environment with prefix {}", vars.len(), prefix);
		Self { prefix: prefix.to_string(), vars }
	}

	/// Environment variable name for a key: prefix + upper-cased key with
	/// every non-alphanumeric character replaced by `_`
	pub fn var_name(&self, key: &str) -> String {
		format!("{}{}", self.prefix, env_suffix(key))
	}
}

/// Key part of an environment variable name. The registry refuses two keys
/// with the same suffix, so the mapping stays one-to-one.
pub fn env_suffix(key: &str) -> String {
	key.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
		.collect()
}

#[async_trait]
impl DefaultsProvider for EnvDefaults {
	async fn read_default(&self, key: &str) -> ClResult<Option<Box<str>>> {
		Ok(self.vars.get(&self.var_name(key)).map(|v| v.as_str().into()))
	}
}

// FileDefaults //
//**************//
/// Defaults read from a YAML document.
///
/// Nested maps are flattened with `.`, so both of these define `polling.time`:
///
/// ```yaml
/// polling.time: 30
/// polling:
///   time: 30
/// ```
///
/// Sequences are kept as JSON text (for `json` keys). A JSON object value has
/// to be given as a quoted string since maps are always flattened.
#[derive(Debug, Default)]
pub struct FileDefaults {
	values: HashMap<String, String>,
}

impl FileDefaults {
	pub fn load(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)?;
		let defaults = Self::parse(&text).map_err(|err| match err {
			Error::ConfigError(msg) => {
				Error::ConfigError(format!("{}: {}", path.display(), msg))
			}
			err => err,
		})?;
		info!("Loaded {} default(s) from {}", defaults.values.len(), path.display());
		Ok(defaults)
	}

	pub fn parse(text: &str) -> ClResult<Self> {
		let doc: serde_yaml::Value = serde_yaml::from_str(text)
			.map_err(|err| Error::ConfigError(format!("Invalid defaults file: {}", err)))?;

		let mut values = HashMap::new();
		match doc {
			serde_yaml::Value::Null => {}
			serde_yaml::Value::Mapping(map) => flatten("", &map, &mut values)?,
			_ => {
				return Err(Error::ConfigError(
					"Invalid defaults file: top level must be a mapping".into(),
				));
			}
		}
		Ok(Self { values })
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Keys may be spelled flat (`polling.time`) or nested (`polling: {time}`).
/// One file may not use both for the same key.
fn insert_unique(out: &mut HashMap<String, String>, key: String, value: String) -> ClResult<()> {
	if out.contains_key(&key) {
		return Err(Error::ConfigError(format!(
			"Invalid defaults file: '{}' is defined more than once",
			key
		)));
	}
	out.insert(key, value);
	Ok(())
}

fn flatten(
	prefix: &str,
	map: &serde_yaml::Mapping,
	out: &mut HashMap<String, String>,
) -> ClResult<()> {
	for (k, v) in map {
		let name = match k {
			serde_yaml::Value::String(s) => s.clone(),
			serde_yaml::Value::Number(n) => n.to_string(),
			serde_yaml::Value::Bool(b) => b.to_string(),
			_ => {
				return Err(Error::ConfigError(format!(
					"Invalid defaults file: unsupported key under '{}'",
					prefix
				)));
			}
		};
		let key = if prefix.is_empty() { name } else { format!("{}.{}", prefix, name) };

		match v {
			serde_yaml::Value::Null => {}
			serde_yaml::Value::Bool(b) => {
				insert_unique(out, key, b.to_string())?;
			}
			serde_yaml::Value::Number(n) => {
				insert_unique(out, key, n.to_string())?;
			}
			serde_yaml::Value::String(s) => {
				insert_unique(out, key, s.clone())?;
			}
			serde_yaml::Value::Sequence(_) => {
				let json = serde_json::to_string(v).map_err(|err| {
					Error::ConfigError(format!("Invalid defaults file: '{}': {}", key, err))
				})?;
				insert_unique(out, key, json)?;
			}
			serde_yaml::Value::Mapping(inner) => flatten(&key, inner, out)?,
			serde_yaml::Value::Tagged(_) => {
				return Err(Error::ConfigError(format!(
					"Invalid defaults file: tagged value at '{}' is not supported",
					key
				)));
			}
		}
	}
	Ok(())
}

#[async_trait]
impl DefaultsProvider for FileDefaults {
	async fn read_default(&self, key: &str) -> ClResult<Option<Box<str>>> {
		Ok(self.values.get(key).map(|v| v.as_str().into()))
	}
}

// LayeredDefaults //
//*****************//
/// Ordered chain of sources. The first one that knows the key wins; errors
/// from any consulted source are returned as they are.
#[derive(Debug, Default)]
pub struct LayeredDefaults {
	layers: Vec<Arc<dyn DefaultsProvider>>,
}

impl LayeredDefaults {
	pub fn new() -> Self {
		Self { layers: Vec::new() }
	}

	pub fn with(mut self, layer: Arc<dyn DefaultsProvider>) -> Self {
		self.layers.push(layer);
		self
	}
}

#[async_trait]
impl DefaultsProvider for LayeredDefaults {
	async fn read_default(&self, key: &str) -> ClResult<Option<Box<str>>> {
		for layer in &self.layers {
			if let Some(value) = layer.read_default(key).await? {
				return Ok(Some(value));
			}
		}
		Ok(None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::types::{SettingDefinition, SettingsRegistry};
	use std::io::Write;

	fn registry() -> Arc<FrozenSettingsRegistry> {
		let mut registry = SettingsRegistry::new();
		registry
			.register(
				SettingDefinition::builder("polling.time")
					.description("Polling interval")
					.default(30_i64)
					.build()
					.unwrap(),
			)
			.unwrap();
		Arc::new(registry.freeze())
	}

	#[tokio::test]
	async fn test_registry_defaults() {
		let defaults = RegistryDefaults::new(registry());
		assert_eq!(defaults.read_default("polling.time").await.unwrap().as_deref(), Some("30"));
		assert_eq!(defaults.read_default("other").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_env_defaults() {
		let defaults = EnvDefaults::from_vars(
			DEFAULT_ENV_PREFIX,
			[
				("TENCONF_POLLING_TIME", "45"),
				("TENCONF_MAINTENANCEWINDOWPOLLCOUNT", "5"),
				("PATH", "/usr/bin"),
			],
		);
		assert_eq!(defaults.var_name("polling.overdue.time"), "TENCONF_POLLING_OVERDUE_TIME");
		assert_eq!(defaults.read_default("polling.time").await.unwrap().as_deref(), Some("45"));
		assert_eq!(
			defaults.read_default("maintenanceWindowPollCount").await.unwrap().as_deref(),
			Some("5")
		);
		assert_eq!(defaults.read_default("polling.overdue.time").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_file_defaults_flattening() {
		let defaults = FileDefaults::parse(
			"polling:\n  time: 60\n  overdue.time: \"00:10:00\"\n\
			 anonymous.download.enabled: true\n\
			 action.cleanup.actionStatus: [CANCELED, ERROR]\n\
			 authentication.header.authority: ~\n",
		)
		.unwrap();
		assert_eq!(defaults.len(), 4);
		assert_eq!(defaults.read_default("polling.time").await.unwrap().as_deref(), Some("60"));
		assert_eq!(
			defaults.read_default("polling.overdue.time").await.unwrap().as_deref(),
			Some("00:10:00")
		);
		assert_eq!(
			defaults.read_default("anonymous.download.enabled").await.unwrap().as_deref(),
			Some("true")
		);
		assert_eq!(
			defaults.read_default("action.cleanup.actionStatus").await.unwrap().as_deref(),
			Some(r#"["CANCELED","ERROR"]"#)
		);
		assert_eq!(defaults.read_default("authentication.header.authority").await.unwrap(), None);
	}

	#[test]
	fn test_file_defaults_rejects_non_mapping() {
		assert!(matches!(FileDefaults::parse("- a\n- b\n"), Err(Error::ConfigError(_))));
		assert!(FileDefaults::parse("").unwrap().is_empty());
	}

	#[test]
	fn test_file_defaults_rejects_key_defined_twice() {
		let text = "polling.time: 15\npolling:\n  time: 20\n";
		assert!(matches!(
			FileDefaults::parse(text),
			Err(Error::ConfigError(msg)) if msg.contains("polling.time")
		));

		let text = "polling:\n  time: 20\n  overdue:\n    time: \"00:01:00\"\n";
		assert_eq!(FileDefaults::parse(text).unwrap().len(), 2);
	}

	#[test]
	fn test_file_defaults_load() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "polling.time: 15").unwrap();
		let defaults = FileDefaults::load(file.path()).unwrap();
		assert_eq!(defaults.len(), 1);

		let missing = FileDefaults::load("/nonexistent/defaults.yaml");
		assert!(matches!(missing, Err(Error::Io(_))));
	}

	#[tokio::test]
	async fn test_layered_first_hit_wins() {
		let env = EnvDefaults::from_vars(DEFAULT_ENV_PREFIX, [("TENCONF_POLLING_TIME", "90")]);
		let layered = LayeredDefaults::new()
			.with(Arc::new(env))
			.with(Arc::new(RegistryDefaults::new(registry())));
		assert_eq!(layered.read_default("polling.time").await.unwrap().as_deref(), Some("90"));

		let layered = LayeredDefaults::new()
			.with(Arc::new(EnvDefaults::default()))
			.with(Arc::new(RegistryDefaults::new(registry())));
		assert_eq!(layered.read_default("polling.time").await.unwrap().as_deref(), Some("30"));
		assert_eq!(layered.read_default("unknown").await.unwrap(), None);
	}
}

// vim: ts=4

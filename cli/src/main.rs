//! `tenconf` - tenant configuration administration
//!
//! Reads and writes one tenant's configuration against the local override
//! database. Results go to stdout as JSON, logs go to stderr.

#![forbid(unsafe_code)]

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tenconf_types::auth::ROLE_ADMIN;

#[derive(Parser)]
#[command(name = "tenconf", version)]
#[command(about = "Tenant configuration administration", long_about = None)]
pub struct Cli {
	/// Directory holding the override database
	#[arg(long, env = "TENCONF_DB_DIR", default_value = "./data")]
	pub db_dir: PathBuf,

	/// YAML file with global defaults
	#[arg(long, env = "TENCONF_DEFAULTS_FILE")]
	pub defaults_file: Option<PathBuf>,

	/// Tenant to act on
	#[arg(short, long, default_value_t = 1)]
	pub tenant: u32,

	/// Caller identity recorded in the logs
	#[arg(long, default_value = "cli")]
	pub id_tag: String,

	/// Roles of the caller (repeatable)
	#[arg(short, long = "role", value_name = "ROLE", default_value = ROLE_ADMIN)]
	pub roles: Vec<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Effective value of a key for the tenant
	Get { key: String },
	/// Global default of a key, ignoring the tenant's override
	GetGlobal { key: String },
	/// Validate and store an override
	Set { key: String, value: String },
	/// Remove an override, falling back to the global default
	Delete { key: String },
	/// Effective values of all keys
	List {
		#[arg(long)]
		prefix: Option<String>,
	},
	/// Registered keys with their type, permission and embedded default
	Keys {
		#[arg(long)]
		prefix: Option<String>,
	},
	/// Check every global default against its key
	CheckDefaults,
}

fn init_logging() {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging();

	match commands::run(cli).await {
		Ok(output) => {
			println!("{}", output);
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("Error: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4

//! Global defaults provider trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// Read-only source of system-wide default values, independent of tenant.
///
/// Values are returned raw (string-encoded). `None` means the key has no
/// global default.
#[async_trait]
pub trait DefaultsProvider: Debug + Send + Sync {
	async fn read_default(&self, key: &str) -> ClResult<Option<Box<str>>>;
}

// vim: ts=4

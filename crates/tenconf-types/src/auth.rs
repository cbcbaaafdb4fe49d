//! Caller context passed explicitly into every configuration operation

use crate::types::TnId;

/// Role granting full administrative access to a tenant
pub const ROLE_ADMIN: &str = "SADM";
/// Role granting read/write access to a tenant's configuration
pub const ROLE_TENANT_CONFIG: &str = "TCFG";

/// Authenticated caller identity
///
/// `system` marks internal (non-user) code paths. A system context may read
/// configuration of the tenant it is bound to, but writes still need roles.
#[derive(Clone, Debug)]
pub struct Auth {
	pub tn_id: TnId,
	pub id_tag: Box<str>,
	pub roles: Box<[Box<str>]>,
	pub system: bool,
}

impl Auth {
	pub fn new(tn_id: TnId, id_tag: &str, roles: &[&str]) -> Self {
		Self {
			tn_id,
			id_tag: id_tag.into(),
			roles: roles.iter().map(|r| Box::from(*r)).collect(),
			system: false,
		}
	}

	/// Context for internal code acting on behalf of a tenant
	pub fn system(tn_id: TnId) -> Self {
		Self { tn_id, id_tag: "system".into(), roles: Box::new([]), system: true }
	}

	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role)
	}

	pub fn can_read_config(&self) -> bool {
		self.system || self.has_role(ROLE_TENANT_CONFIG) || self.has_role(ROLE_ADMIN)
	}
}


// vim: ts=4

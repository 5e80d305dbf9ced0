//! Admin and primary-admin checks.

use crate::store::AdminSet;

/// Access control over the current admin list.
#[derive(Clone, Debug, Default)]
pub struct AccessControl {
    owner_id: Option<String>,
}

impl AccessControl {
    /// `owner_id` is the configured bot owner; when unset the first admin
    /// in the list is the primary admin.
    pub fn new(owner_id: Option<String>) -> Self {
        let owner_id = owner_id.filter(|id| !id.trim().is_empty());
        Self { owner_id }
    }

    pub fn is_admin(&self, admins: &AdminSet, id: &str) -> bool {
        admins.contains(id)
    }

    pub fn primary_admin<'a>(&'a self, admins: &'a AdminSet) -> Option<&'a str> {
        self.owner_id.as_deref().or_else(|| admins.first())
    }

    pub fn is_primary_admin(&self, admins: &AdminSet, id: &str) -> bool {
        self.primary_admin(admins) == Some(id)
    }
}

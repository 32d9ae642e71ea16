use std::collections::HashSet;

use error_stack::Report;

use crate::entity::{Identity, UserId};
use crate::{fail, KernelError};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    Admin,
    Member,
}

/// An authenticated caller together with the role resolved for it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Principal {
    identity: Identity,
    role: Role,
}

impl Principal {
    pub fn new(identity: Identity, role: Role) -> Self {
        Self { identity, role }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn id(&self) -> &UserId {
        self.identity.id()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn ensure_admin(&self) -> Result<(), Report<KernelError>> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(fail(KernelError::Forbidden, "Admin access required"))
        }
    }

    /// Owners act on their own records, admins on any record.
    pub fn ensure_owner_or_admin(&self, owner: Option<&UserId>) -> Result<(), Report<KernelError>> {
        if self.is_admin() || owner == Some(self.id()) {
            Ok(())
        } else {
            Err(fail(
                KernelError::Forbidden,
                "You can only modify your own records",
            ))
        }
    }
}

/// Settable set of privileged identities.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AdminAllowList(HashSet<UserId>);

impl AdminAllowList {
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn role_of(&self, id: &UserId) -> Role {
        if self.0.contains(id) {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn authorize(&self, identity: Identity) -> Principal {
        let role = self.role_of(identity.id());
        Principal::new(identity, role)
    }
}

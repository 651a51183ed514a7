//! Explicit per-request session context.
//!
//! Handlers build a [`SessionContext`] from the request's credentials and
//! pass it down to the wizard and persistence code, so nothing below the
//! HTTP layer reads an ambient "current user".

use serde::Serialize;

use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The signed-in identity as seen by domain code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRef {
    pub id: DbId,
    pub role: String,
}

impl IdentityRef {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<IdentityRef>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn signed_in(id: DbId, role: impl Into<String>) -> Self {
        Self {
            identity: Some(IdentityRef {
                id,
                role: role.into(),
            }),
        }
    }

    pub fn identity(&self) -> Option<&IdentityRef> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

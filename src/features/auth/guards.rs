//! Role- and ownership-based authorization checks.
//!
//! Every protected resource reports a permission failure as HTTP 403 with a
//! message naming that resource, so clients can show it without mapping codes.
//!
//! Roles:
//! - GOVERNMENT: oversees every report, registers utility providers, reads analytics
//! - UTILITY_PROVIDER: triages reports routed to it, registers maintenance teams and employees
//! - MAINTENANCE_TEAM: moves its assigned reports through the lifecycle
//! - RESIDENT: submits, edits, deletes and votes on reports

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, UserRole};

/// Resource families guarded by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Report,
    UtilityProvider,
    MaintenanceTeam,
    Employee,
    Analytics,
}

impl Resource {
    /// Human-readable 403 message for this resource
    pub fn permission_denied_message(self) -> &'static str {
        match self {
            Resource::Report => "You do not have permission to access this report",
            Resource::UtilityProvider => {
                "You do not have permission to manage utility providers"
            }
            Resource::MaintenanceTeam => {
                "You do not have permission to manage this maintenance team"
            }
            Resource::Employee => "You do not have permission to manage employees",
            Resource::Analytics => "You do not have permission to view analytics",
        }
    }

    pub fn denied(self) -> AppError {
        AppError::Forbidden(self.permission_denied_message().to_string())
    }
}

impl AuthenticatedUser {
    /// Require one of `roles`, failing with the resource's permission message
    pub fn authorize(&self, resource: Resource, roles: &[UserRole]) -> Result<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::debug!(
                "Denied {} ({}) access to {:?}",
                self.user_id,
                self.role,
                resource
            );
            Err(resource.denied())
        }
    }

    /// Require that the caller is `owner_id`, or holds one of `override_roles`
    pub fn authorize_owner(
        &self,
        resource: Resource,
        owner_id: Uuid,
        override_roles: &[UserRole],
    ) -> Result<()> {
        if self.user_id == owner_id || override_roles.contains(&self.role) {
            Ok(())
        } else {
            Err(resource.denied())
        }
    }
}

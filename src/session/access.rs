//! Role-based view access.

use crate::models::{Role, RoleDetail, User};

/// Bare role identifier that marks an administrator.
pub const ADMIN_ROLE_ID: &str = "admin";
/// Role display name that marks an administrator.
pub const ADMIN_ROLE_NAME: &str = "SUPER ADMINISTRADOR";

/// Whether `user` may open the view identified by `view`
/// (e.g. `/admin-proposals`).
///
/// A role carrying an explicit allow-list is authoritative. A user whose
/// role has no allow-list structure at all is granted access — fail-open,
/// kept as the observed production behavior; tightening it is a policy
/// decision, not a refactor.
pub fn has_access_to_view(user: Option<&User>, view: &str) -> bool {
    let Some(user) = user else {
        return false;
    };
    match &user.role {
        Some(Role::Detailed(RoleDetail {
            routes: Some(routes),
            ..
        })) => routes.iter().any(|r| r == view),
        _ => true,
    }
}

/// Views the user may open; falls back to the basic set when the role
/// carries no allow-list.
pub fn allowed_views(user: Option<&User>) -> Vec<String> {
    let Some(user) = user else {
        return Vec::new();
    };
    match &user.role {
        Some(Role::Detailed(RoleDetail {
            routes: Some(routes),
            ..
        })) => routes.clone(),
        _ => vec!["/home".to_string(), "/login".to_string()],
    }
}

/// Administrators are marked either by the bare role id or by the role's
/// display name.
pub fn is_admin(user: Option<&User>) -> bool {
    match user.and_then(|u| u.role.as_ref()) {
        Some(Role::Name(name)) => name == ADMIN_ROLE_ID,
        Some(Role::Detailed(detail)) => detail.name.as_deref() == Some(ADMIN_ROLE_NAME),
        None => false,
    }
}

/// Display name of the user's role, if any.
pub fn role_name(user: Option<&User>) -> Option<String> {
    match user?.role.as_ref()? {
        Role::Detailed(detail) => detail.name.clone(),
        Role::Name(name) => Some(name.clone()),
    }
}

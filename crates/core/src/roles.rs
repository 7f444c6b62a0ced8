//! Roles, back-office sections, and path gating.
//!
//! Role names must match the `profiles.role` check constraint in
//! `20260301000002_create_profiles.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

/// Login page that unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/auth/login";
/// Where sessions without back-office rights are sent.
pub const HOME_PATH: &str = "/";

/// Path prefixes that only need an authenticated session.
const SESSION_PREFIXES: &[&str] = &["/account", "/cart", "/wishlist", "/checkout"];

/// A profile's role. This is the only authorization signal in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Staff => ROLE_STAFF,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether the role may enter the back office at all.
    pub fn is_back_office(self) -> bool {
        match self {
            Role::Staff | Role::Admin => true,
            Role::User => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {ROLE_USER}, {ROLE_STAFF}, {ROLE_ADMIN}"
            ))),
        }
    }
}

/// Back-office pages and the roles each one admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminSection {
    Dashboard,
    Products,
    Orders,
    Users,
}

impl AdminSection {
    pub const ALL: [AdminSection; 4] = [
        AdminSection::Dashboard,
        AdminSection::Products,
        AdminSection::Orders,
        AdminSection::Users,
    ];

    pub fn path(self) -> &'static str {
        match self {
            AdminSection::Dashboard => "/admin",
            AdminSection::Products => "/admin/products",
            AdminSection::Orders => "/admin/orders",
            AdminSection::Users => "/admin/users",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AdminSection::Dashboard => "Dashboard",
            AdminSection::Products => "Products",
            AdminSection::Orders => "Orders",
            AdminSection::Users => "Users",
        }
    }

    /// Products and Users are admin-only; Dashboard and Orders admit staff.
    pub fn allows(self, role: Role) -> bool {
        match self {
            AdminSection::Dashboard | AdminSection::Orders => role.is_back_office(),
            AdminSection::Products | AdminSection::Users => role == Role::Admin,
        }
    }

    /// Resolve the section that owns a path under `/admin`.
    ///
    /// Unknown sub-paths fall under the dashboard rule (staff or admin).
    pub fn for_path(path: &str) -> Option<AdminSection> {
        let rest = strip_query(path).strip_prefix("/admin")?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        let first = rest.trim_start_matches('/').split('/').next().unwrap_or("");
        Some(match first {
            "products" => AdminSection::Products,
            "orders" => AdminSection::Orders,
            "users" => AdminSection::Users,
            _ => AdminSection::Dashboard,
        })
    }
}

/// Navigation entries shown to a role inside the back office.
pub fn visible_sections(role: Role) -> Vec<AdminSection> {
    AdminSection::ALL
        .into_iter()
        .filter(|section| section.allows(role))
        .collect()
}

/// Outcome of gating a page path against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    /// No session; send the visitor to log in.
    Unauthenticated,
    /// Session present but the role is insufficient; send them home.
    Forbidden,
}

impl Access {
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Access::Granted => None,
            Access::Unauthenticated => Some(LOGIN_PATH),
            Access::Forbidden => Some(HOME_PATH),
        }
    }
}

/// Drop any query string or fragment.
fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide whether a session with `role` (or no session) may open `path`.
pub fn check_access(path: &str, role: Option<Role>) -> Access {
    let path = strip_query(path);
    if let Some(section) = AdminSection::for_path(path) {
        return match role {
            None => Access::Unauthenticated,
            Some(role) if !role.is_back_office() => Access::Forbidden,
            Some(role) if !section.allows(role) => Access::Forbidden,
            Some(_) => Access::Granted,
        };
    }

    let needs_session = SESSION_PREFIXES.iter().any(|p| has_prefix(path, p));
    match (needs_session, role) {
        (true, None) => Access::Unauthenticated,
        _ => Access::Granted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::User, Role::Staff, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_is_sent_home_from_every_admin_path() {
        for section in AdminSection::ALL {
            assert_eq!(
                check_access(section.path(), Some(Role::User)),
                Access::Forbidden,
                "user must not reach {}",
                section.path()
            );
        }
        assert_eq!(
            check_access("/admin/products/42", Some(Role::User)),
            Access::Forbidden
        );
    }

    #[test]
    fn test_staff_reaches_dashboard_and_orders_only() {
        assert_eq!(check_access("/admin", Some(Role::Staff)), Access::Granted);
        assert_eq!(
            check_access("/admin/orders", Some(Role::Staff)),
            Access::Granted
        );
        assert_eq!(
            check_access("/admin/products", Some(Role::Staff)),
            Access::Forbidden
        );
        assert_eq!(
            check_access("/admin/users", Some(Role::Staff)),
            Access::Forbidden
        );
    }

    #[test]
    fn test_admin_reaches_all_sections() {
        for section in AdminSection::ALL {
            assert_eq!(check_access(section.path(), Some(Role::Admin)), Access::Granted);
        }
    }

    #[test]
    fn test_admin_paths_without_session_go_to_login() {
        let access = check_access("/admin/orders", None);
        assert_eq!(access, Access::Unauthenticated);
        assert_eq!(access.redirect_path(), Some(LOGIN_PATH));
    }

    #[test]
    fn test_query_string_does_not_change_the_gate() {
        assert_eq!(check_access("/admin?tab=1", None), Access::Unauthenticated);
        assert_eq!(check_access("/admin?tab=1", Some(Role::User)), Access::Forbidden);
        assert_eq!(check_access("/admin?tab=1", Some(Role::Staff)), Access::Granted);
        assert_eq!(
            check_access("/admin/products?page=2", Some(Role::Staff)),
            Access::Forbidden
        );
        assert_eq!(
            check_access("/admin/users?q=a", Some(Role::Staff)),
            Access::Forbidden
        );
        assert_eq!(
            check_access("/admin/users#top", Some(Role::Staff)),
            Access::Forbidden
        );
        assert_eq!(
            check_access("/admin/orders?status=pending", Some(Role::Staff)),
            Access::Granted
        );
        assert_eq!(
            check_access("/admin/products?page=2", None),
            Access::Unauthenticated
        );
        assert_eq!(check_access("/cart?x=1", None), Access::Unauthenticated);
        assert_eq!(
            AdminSection::for_path("/admin/products?page=2"),
            Some(AdminSection::Products)
        );
    }

    #[test]
    fn test_session_pages_require_login() {
        for path in ["/account", "/cart", "/wishlist", "/account/orders", "/checkout"] {
            assert_eq!(check_access(path, None), Access::Unauthenticated, "{path}");
            assert_eq!(check_access(path, Some(Role::User)), Access::Granted, "{path}");
        }
    }

    #[test]
    fn test_public_pages_are_open() {
        assert_eq!(check_access("/", None), Access::Granted);
        assert_eq!(check_access("/shop", None), Access::Granted);
        assert_eq!(check_access("/cartoons", None), Access::Granted);
        assert_eq!(check_access("/administrator", None), Access::Granted);
    }

    #[test]
    fn test_forbidden_redirects_home() {
        assert_eq!(Access::Forbidden.redirect_path(), Some(HOME_PATH));
        assert_eq!(Access::Granted.redirect_path(), None);
    }

    #[test]
    fn test_visible_sections_follow_role() {
        assert!(visible_sections(Role::User).is_empty());
        assert_eq!(
            visible_sections(Role::Staff),
            vec![AdminSection::Dashboard, AdminSection::Orders]
        );
        assert_eq!(visible_sections(Role::Admin).len(), 4);
    }
}

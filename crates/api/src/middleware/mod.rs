//! Request extractors for identity and role gates.
//!
//! [`auth::AuthUser`] resolves the session; [`auth::MaybeAuthUser`] does the
//! same for public routes. The [`rbac`] wrappers add the back-office checks.

pub mod auth;
pub mod rbac;

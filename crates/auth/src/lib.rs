//! `squidex-auth` — app roles and permissions.
//!
//! This crate is intentionally decoupled from HTTP and storage: it only knows
//! how permissions match and how an app's roles are composed.

pub mod permission_set;
pub mod permissions;
pub mod role;
pub mod roles;

pub use permission_set::PermissionSet;
pub use permissions::Permission;
pub use role::{is_default, DefaultRole, Role, DEFAULT_ROLES};
pub use roles::{Roles, RolesError};

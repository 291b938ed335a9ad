//! App role collection: custom roles layered over the built-in defaults.
//!
//! `Roles` is immutable. Every change returns a new collection, and changes
//! that would not alter anything hand back the receiver's own storage, so
//! callers can detect "nothing changed" with [`Roles::ptr_eq`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use squidex_core::{DomainError, ValueObject};

use crate::role::{default_role, is_default, DEFAULT_ROLES};
use crate::{Permission, PermissionSet, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RolesError {
    #[error("a role named '{0}' already exists")]
    DuplicateName(String),

    #[error("role name must not be empty")]
    EmptyName,
}

impl From<RolesError> for DomainError {
    fn from(value: RolesError) -> Self {
        match value {
            RolesError::DuplicateName(_) => DomainError::conflict(value.to_string()),
            RolesError::EmptyName => DomainError::validation(value.to_string()),
        }
    }
}

/// Custom roles in insertion order plus a name index.
#[derive(Debug, Default)]
struct CustomRoles {
    entries: Vec<Role>,
    index: HashMap<String, usize>,
}

impl CustomRoles {
    fn from_entries(entries: Vec<Role>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, role)| (role.name().to_string(), position))
            .collect();

        Self { entries, index }
    }

    fn get(&self, name: &str) -> Option<&Role> {
        self.index.get(name).map(|&position| &self.entries[position])
    }
}

/// The roles of one app.
///
/// Invariants:
/// - no custom entry is named after a default role
/// - custom names are unique
/// - default roles are never stored; they are materialized on read
#[derive(Clone)]
pub struct Roles {
    custom: Arc<CustomRoles>,
}

impl Roles {
    /// A collection with no custom roles.
    pub fn empty() -> Self {
        Self {
            custom: Arc::new(CustomRoles::default()),
        }
    }

    /// Build from custom entries, in iteration order.
    ///
    /// Entries with an empty name or named after a default role are dropped.
    /// A repeated name
    /// replaces the permissions of the first occurrence and keeps its position.
    pub fn from_custom<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, PermissionSet)>,
        N: Into<String>,
    {
        let mut roles: Vec<Role> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (name, permissions) in entries {
            let name = name.into();

            if name.is_empty() {
                warn!("dropping custom role with an empty name");
                continue;
            }

            if is_default(&name) {
                warn!(role = %name, "dropping custom role that shadows a default role");
                continue;
            }

            match index.get(&name) {
                Some(&position) => roles[position] = Role::new(name, permissions),
                None => {
                    index.insert(name.clone(), roles.len());
                    roles.push(Role::new(name, permissions));
                }
            }
        }

        Self {
            custom: Arc::new(CustomRoles {
                entries: roles,
                index,
            }),
        }
    }

    /// Whether `a` and `b` share the same storage, i.e. one was returned
    /// unchanged from an operation on the other.
    pub fn ptr_eq(a: &Roles, b: &Roles) -> bool {
        Arc::ptr_eq(&a.custom, &b.custom)
    }

    /// Whether `name` is one of the built-in role names.
    pub fn is_default(name: &str) -> bool {
        is_default(name)
    }

    pub fn custom_count(&self) -> usize {
        self.custom.entries.len()
    }

    /// Add a custom role.
    ///
    /// Adding a default role name is a no-op that returns `self` unchanged.
    pub fn add<I, P>(&self, name: &str, permissions: I) -> Result<Self, RolesError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        if name.is_empty() {
            return Err(RolesError::EmptyName);
        }

        if is_default(name) {
            debug!(role = %name, "ignoring add of default role");
            return Ok(self.clone());
        }

        if self.contains_custom(name) {
            return Err(RolesError::DuplicateName(name.to_string()));
        }

        let mut entries = self.custom.entries.clone();
        entries.push(Role::new(name, PermissionSet::new(permissions)));

        Ok(Self::from_storage(entries))
    }

    /// Replace the permissions of a custom role.
    ///
    /// Unknown names, default names and unchanged permissions return `self`.
    pub fn update<I, P>(&self, name: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        let Some(&position) = self.custom.index.get(name) else {
            debug!(role = %name, "ignoring update of unknown role");
            return self.clone();
        };

        let permissions = PermissionSet::new(permissions);
        let current = &self.custom.entries[position];

        if current.permissions() == &permissions {
            return self.clone();
        }

        let mut entries = self.custom.entries.clone();
        entries[position] = current.with_permissions(permissions);

        Self::from_storage(entries)
    }

    /// Remove a custom role, keeping the order of the others.
    pub fn remove(&self, name: &str) -> Self {
        let Some(&position) = self.custom.index.get(name) else {
            debug!(role = %name, "ignoring remove of unknown role");
            return self.clone();
        };

        let mut entries = self.custom.entries.clone();
        entries.remove(position);

        Self::from_storage(entries)
    }

    /// Whether `name` is a custom or a default role.
    pub fn contains(&self, name: &str) -> bool {
        self.contains_custom(name) || is_default(name)
    }

    pub fn contains_custom(&self, name: &str) -> bool {
        self.custom.index.contains_key(name)
    }

    /// The custom role named `name`.
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.custom.get(name)
    }

    /// Custom roles in insertion order.
    pub fn custom(&self) -> impl Iterator<Item = &Role> {
        self.custom.entries.iter()
    }

    /// Custom roles followed by the default roles in canonical order.
    ///
    /// Default roles keep their `{app}` templates; see [`Roles::try_get`].
    pub fn all(&self) -> impl Iterator<Item = Role> + '_ {
        self.custom()
            .cloned()
            .chain(DEFAULT_ROLES.iter().map(|role| role.to_role()))
    }

    /// Resolve a role for the app `app`.
    ///
    /// Custom roles are returned as stored. Default roles are materialized
    /// with their permission templates bound to `app`.
    pub fn try_get(&self, app: &str, name: &str) -> Option<Role> {
        if let Some(role) = self.custom.get(name) {
            return Some(role.clone());
        }

        default_role(name).map(|role| role.to_role().for_app(app))
    }

    fn from_storage(entries: Vec<Role>) -> Self {
        Self {
            custom: Arc::new(CustomRoles::from_entries(entries)),
        }
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Roles {
    fn eq(&self, other: &Self) -> bool {
        Roles::ptr_eq(self, other) || self.custom.entries == other.custom.entries
    }
}

impl Eq for Roles {}

impl ValueObject for Roles {}

impl core::fmt::Debug for Roles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.custom.entries.iter()).finish()
    }
}

// Persisted shape: { "<custom name>": ["<permission id>", ...], ... }

/// Upper bound on entries reserved up front from a deserializer's size hint.
const MAX_PREALLOCATED_ROLES: usize = 256;

impl Serialize for Roles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.custom_count()))?;
        for role in self.custom() {
            map.serialize_entry(role.name(), role.permissions())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Roles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RolesVisitor;

        impl<'de> Visitor<'de> for RolesVisitor {
            type Value = Roles;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a map of role names to permission lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED_ROLES);
                let mut entries: Vec<(String, PermissionSet)> = Vec::with_capacity(capacity);
                while let Some(entry) = access.next_entry::<String, PermissionSet>()? {
                    entries.push(entry);
                }
                Ok(Roles::from_custom(entries))
            }
        }

        deserializer.deserialize_map(RolesVisitor)
    }
}

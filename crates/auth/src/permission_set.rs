//! Unordered, deduplicated permission collections.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use squidex_core::ValueObject;

use crate::Permission;

/// An immutable set of permissions.
///
/// Equality ignores the order permissions were supplied in and any
/// duplicates. Iteration and serialization use sorted id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// Whether any member grants `permission`.
    pub fn allows(&self, permission: &Permission) -> bool {
        self.0.iter().any(|p| p.allows(permission))
    }

    /// Whether any member overlaps `permission`.
    pub fn includes(&self, permission: &Permission) -> bool {
        self.0.iter().any(|p| p.includes(permission))
    }

    /// A new set holding the members of both sets.
    pub fn union(&self, other: &PermissionSet) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// A new set with `f` applied to every member.
    pub fn map(&self, f: impl Fn(&Permission) -> Permission) -> Self {
        Self(self.0.iter().map(f).collect())
    }

    /// Sorted ids, the shape used when persisting a set.
    pub fn to_ids(&self) -> Vec<String> {
        self.0.iter().map(|p| p.as_str().to_string()).collect()
    }
}

impl ValueObject for PermissionSet {}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

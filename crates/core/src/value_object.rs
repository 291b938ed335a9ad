//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value; holders of the old value never observe the change.
///
/// Permissions, permission sets, and role collections are all value objects:
/// two `PermissionSet`s holding the same ids are equal regardless of the
/// order they were built in.
///
/// The trait requires:
/// - **Clone**: values are passed around by copy (cheap for `Arc`-backed types)
/// - **PartialEq**: compared by attribute values
/// - **Debug**: helpful for logging and test failures
/// - **Send + Sync**: immutable values are shared freely across threads
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug + Send + Sync {}

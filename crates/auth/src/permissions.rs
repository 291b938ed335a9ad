use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use squidex_core::{DomainError, DomainResult, ValueObject};

/// Separator between the segments of a permission id.
pub const SEGMENT_SEPARATOR: char = '.';

/// Separator between alternatives inside a single segment.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Segment that matches any other segment.
pub const WILDCARD: &str = "*";

/// Permission identifier.
///
/// Permissions are dot-segmented strings (e.g. `squidex.apps.blog.contents.read`).
/// A segment is either a literal, the wildcard `*`, or a list of alternatives
/// such as `contents|assets`. Segment comparison ignores ASCII case; the id is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Build a permission from untrusted input, rejecting empty ids and
    /// empty segments (`a..b`, trailing dots).
    pub fn parse(id: impl Into<Cow<'static, str>>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::validation("permission id must not be empty"));
        }
        if id.split(SEGMENT_SEPARATOR).any(|segment| segment.trim().is_empty()) {
            return Err(DomainError::validation(format!(
                "permission '{id}' contains an empty segment"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }

    /// Whether holding `self` grants `other`.
    ///
    /// Every segment of `self` must intersect the segment of `other` at the
    /// same position. A shorter permission grants everything beneath it, a
    /// longer one never grants its parent.
    pub fn allows(&self, other: &Permission) -> bool {
        let mut theirs = other.segments();

        self.segments().all(|mine| match theirs.next() {
            Some(candidate) => segments_intersect(mine, candidate),
            None => false,
        })
    }

    /// Whether `self` and `other` overlap on their common prefix.
    ///
    /// Unlike [`Permission::allows`] this is symmetric: `squidex.apps.blog`
    /// includes `squidex.apps.blog.contents` and vice versa.
    pub fn includes(&self, other: &Permission) -> bool {
        self.segments()
            .zip(other.segments())
            .all(|(mine, theirs)| segments_intersect(mine, theirs))
    }

    /// Whether the id starts with the given dot-segmented prefix.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }
}

fn segments_intersect(lhs: &str, rhs: &str) -> bool {
    if lhs == WILDCARD || rhs == WILDCARD {
        return true;
    }

    lhs.split(ALTERNATIVE_SEPARATOR).any(|left| {
        rhs.split(ALTERNATIVE_SEPARATOR)
            .any(|right| left.trim().eq_ignore_ascii_case(right.trim()))
    })
}

impl ValueObject for Permission {}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

use squidex_core::ValueObject;

use crate::{Permission, PermissionSet};

/// Placeholder substituted with the owning app name in default role templates.
pub const APP_PLACEHOLDER: &str = "{app}";

/// A named bundle of permissions.
///
/// Default roles carry permission templates containing [`APP_PLACEHOLDER`];
/// use [`Role::for_app`] to bind them to a concrete app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    permissions: PermissionSet,
    is_default: bool,
}

impl Role {
    pub const OWNER: &'static str = "Owner";
    pub const READER: &'static str = "Reader";
    pub const EDITOR: &'static str = "Editor";
    pub const DEVELOPER: &'static str = "Developer";

    pub fn new(name: impl Into<String>, permissions: PermissionSet) -> Self {
        let name = name.into();
        let is_default = is_default(&name);

        Self {
            name,
            permissions,
            is_default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn allows(&self, permission: &Permission) -> bool {
        self.permissions.allows(permission)
    }

    /// Same role with every `{app}` placeholder replaced by `app`.
    pub fn for_app(&self, app: &str) -> Self {
        let permissions = self.permissions.map(|permission| {
            if permission.as_str().contains(APP_PLACEHOLDER) {
                Permission::new(permission.as_str().replace(APP_PLACEHOLDER, app))
            } else {
                permission.clone()
            }
        });

        Self {
            name: self.name.clone(),
            permissions,
            is_default: self.is_default,
        }
    }

    pub(crate) fn with_permissions(&self, permissions: PermissionSet) -> Self {
        Self {
            name: self.name.clone(),
            permissions,
            is_default: self.is_default,
        }
    }
}

impl ValueObject for Role {}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Built-in role definition: a fixed name and its permission templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRole {
    pub name: &'static str,
    pub permissions: &'static [&'static str],
}

impl DefaultRole {
    /// The role with its permissions still in template form.
    pub fn to_role(&self) -> Role {
        Role {
            name: self.name.to_string(),
            permissions: PermissionSet::new(self.permissions.iter().copied()),
            is_default: true,
        }
    }
}

/// Built-in roles in canonical order.
pub const DEFAULT_ROLES: &[DefaultRole] = &[
    DefaultRole {
        name: Role::OWNER,
        permissions: &["squidex.apps.{app}.*"],
    },
    DefaultRole {
        name: Role::READER,
        permissions: &[
            "squidex.apps.{app}.assets.read",
            "squidex.apps.{app}.contents.*.read",
            "squidex.apps.{app}.common",
        ],
    },
    DefaultRole {
        name: Role::EDITOR,
        permissions: &[
            "squidex.apps.{app}.assets",
            "squidex.apps.{app}.contents.*",
            "squidex.apps.{app}.roles.read",
            "squidex.apps.{app}.workflows.read",
            "squidex.apps.{app}.common",
        ],
    },
    DefaultRole {
        name: Role::DEVELOPER,
        permissions: &[
            "squidex.apps.{app}.api",
            "squidex.apps.{app}.assets",
            "squidex.apps.{app}.contents.*",
            "squidex.apps.{app}.patterns",
            "squidex.apps.{app}.rules",
            "squidex.apps.{app}.schemas",
            "squidex.apps.{app}.workflows",
            "squidex.apps.{app}.common",
        ],
    },
];

/// Whether `name` is one of the built-in role names (case-sensitive).
pub fn is_default(name: &str) -> bool {
    default_role(name).is_some()
}

pub(crate) fn default_role(name: &str) -> Option<&'static DefaultRole> {
    DEFAULT_ROLES.iter().find(|role| role.name == name)
}

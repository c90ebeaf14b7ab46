//! The static role → resource → action permission table.
//!
//! Every protected route carries a logical name of the form `<resource>.<action>`
//! (`user.index`, `abouts.destroy`). A request is allowed only when the caller's role
//! lists that action under that resource:
//!
//! ```json
//! {
//!   "super_admin": {
//!     "user": ["index", "store", "show", "update", "destroy", "roles"],
//!     "abouts": ["index", "show"]
//!   }
//! }
//! ```
//!
//! There are no wildcards and no inheritance between roles. A role missing from the
//! table, a resource missing under a role, an empty action list, and a malformed
//! route name are all plain denials.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub const GUEST_ROLE: &str = "guest";

/// The role a request is evaluated under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// No authenticated user, or a user without an active role record.
    Guest,
    Named(String),
}

impl Role {
    pub fn guest() -> Self {
        Role::Guest
    }

    pub fn named(code: impl Into<String>) -> Self {
        Role::Named(code.into())
    }

    /// Maps the active role code of a user (if any) to a role.
    pub fn from_active(code: Option<&str>) -> Self {
        match code {
            Some(code) if !code.is_empty() => Role::Named(code.to_string()),
            _ => Role::Guest,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Role::Guest => GUEST_ROLE,
            Role::Named(code) => code,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("NOT ALLOWED")]
pub struct AccessDenied;

/// Splits `resource.action[.more]` into `(resource, action)`.
///
/// Returns `None` when either of the first two segments is missing or empty.
pub fn split_route_name(name: &str) -> Option<(&str, &str)> {
    let mut segments = name.split('.');
    let resource = segments.next().filter(|s| !s.is_empty())?;
    let action = segments.next().filter(|s| !s.is_empty())?;
    Some((resource, action))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    roles: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl PermissionTable {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Adds `actions` under `role` / `resource`, creating entries as needed.
    pub fn grant<I, A>(mut self, role: &str, resource: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.roles
            .entry(role.to_string())
            .or_default()
            .entry(resource.to_string())
            .or_default()
            .extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn allows(&self, role: &Role, route_name: &str) -> bool {
        let Some((resource, action)) = split_route_name(route_name) else {
            return false;
        };

        self.roles
            .get(role.code())
            .and_then(|resources| resources.get(resource))
            .is_some_and(|actions| actions.contains(action))
    }

    pub fn authorize(&self, role: &Role, route_name: &str) -> Result<(), AccessDenied> {
        if self.allows(role, route_name) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Lists `role: resource.action` entries that name no known route.
    pub fn unknown_entries<'a, I>(&self, known_route_names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: HashSet<(&str, &str)> = known_route_names
            .into_iter()
            .filter_map(split_route_name)
            .collect();

        let mut unknown: Vec<String> = self
            .roles
            .iter()
            .flat_map(|(role, resources)| {
                resources.iter().flat_map(move |(resource, actions)| {
                    actions.iter().map(move |action| (role, resource, action))
                })
            })
            .filter(|(_, resource, action)| !known.contains(&(resource.as_str(), action.as_str())))
            .map(|(role, resource, action)| format!("{}: {}.{}", role, resource, action))
            .collect();
        unknown.sort();
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn super_admin_table() -> PermissionTable {
        PermissionTable::default()
            .grant(
                "super_admin",
                "user",
                ["index", "store", "show", "update", "destroy", "roles"],
            )
            .grant("super_admin", "abouts", ["index", "show"])
            .grant("editor", "abouts", Vec::<String>::new())
    }

    #[test]
    fn test_listed_triple_is_allowed() {
        let table = super_admin_table();
        let role = Role::named("super_admin");
        assert!(table.authorize(&role, "user.index").is_ok());
        assert!(table.authorize(&role, "user.roles").is_ok());
        assert!(table.authorize(&role, "abouts.show").is_ok());
    }

    #[test]
    fn test_unlisted_action_is_denied() {
        let table = super_admin_table();
        let role = Role::named("super_admin");
        assert_eq!(
            table.authorize(&role, "user.nonexistent-action"),
            Err(AccessDenied)
        );
        assert!(!table.allows(&role, "abouts.destroy"));
    }

    #[test]
    fn test_unknown_role_is_denied_everything() {
        let table = super_admin_table();
        for role in [Role::named("moderator"), Role::named(""), Role::guest()] {
            for name in ["user.index", "abouts.index", "abouts.show", "x.y"] {
                assert!(!table.allows(&role, name), "{} on {}", role, name);
            }
        }
    }

    #[test]
    fn test_unknown_resource_is_denied() {
        let table = super_admin_table();
        assert!(!table.allows(&Role::named("super_admin"), "carousels.index"));
    }

    #[test]
    fn test_empty_action_list_denies_everything() {
        let table = super_admin_table();
        let role = Role::named("editor");
        for action in ["index", "store", "show", "update", "destroy"] {
            assert!(!table.allows(&role, &format!("abouts.{}", action)));
        }
    }

    #[test]
    fn test_malformed_route_names_are_denied() {
        let table = super_admin_table().grant("super_admin", "roles", ["roles"]);
        let role = Role::named("super_admin");
        for name in ["", "roles", "user", ".index", "user.", "."] {
            assert!(!table.allows(&role, name), "{:?}", name);
        }
    }

    #[test]
    fn test_extra_segments_use_first_two() {
        let table = super_admin_table();
        assert!(table.allows(&Role::named("super_admin"), "user.index.extra"));
    }

    #[test]
    fn test_guest_role_uses_guest_entry() {
        let table = PermissionTable::default().grant(GUEST_ROLE, "abouts", ["index"]);
        assert!(table.allows(&Role::guest(), "abouts.index"));
        assert!(!table.allows(&Role::guest(), "abouts.show"));
    }

    #[test]
    fn test_role_from_active() {
        assert_eq!(Role::from_active(None), Role::Guest);
        assert_eq!(Role::from_active(Some("")), Role::Guest);
        assert_eq!(Role::from_active(Some("editor")), Role::named("editor"));
        assert_eq!(Role::Guest.code(), "guest");
    }

    #[test]
    fn test_from_json() {
        let raw = r#"{"super_admin": {"user": ["index", "show"]}, "editor": {}}"#;
        let table = PermissionTable::from_json(raw).unwrap();
        assert!(table.allows(&Role::named("super_admin"), "user.show"));
        assert!(!table.allows(&Role::named("editor"), "user.show"));
        assert!(!table.allows(&Role::named("moderator"), "user.show"));
    }

    #[test]
    fn test_unknown_entries() {
        let table = super_admin_table();
        let unknown = table.unknown_entries(["user.index", "user.store", "user.show", "abouts.index"]);
        assert_eq!(
            unknown,
            vec![
                "super_admin: abouts.show".to_string(),
                "super_admin: user.destroy".to_string(),
                "super_admin: user.roles".to_string(),
                "super_admin: user.update".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_route_name() {
        assert_eq!(split_route_name("user.index"), Some(("user", "index")));
        assert_eq!(split_route_name("upload-image.index"), Some(("upload-image", "index")));
        assert_eq!(split_route_name("roles"), None);
    }
}

//! Loading of the role permission table.
//!
//! The table bundled with the binary (`config/rbac.json`) is used unless
//! `RBAC_CONFIG_PATH` points at a replacement file. It is read once at start-up.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use sitekit_core::PermissionTable;

pub const DEFAULT_RBAC_TABLE: &str = include_str!("../../../config/rbac.json");

#[derive(Clone, Debug, Default)]
pub struct RbacConfig {
    pub path: Option<PathBuf>,
}

impl RbacConfig {
    pub fn from_env() -> Self {
        Self {
            path: env::var("RBAC_CONFIG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn load(&self) -> anyhow::Result<PermissionTable> {
        let table = match &self.path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading RBAC table {}", path.display()))?;
                PermissionTable::from_json(&raw)
                    .with_context(|| format!("parsing RBAC table {}", path.display()))?
            }
            None => PermissionTable::from_json(DEFAULT_RBAC_TABLE)
                .context("parsing bundled RBAC table")?,
        };

        if table.is_empty() {
            tracing::warn!("RBAC table is empty; every protected route will be denied");
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_core::Role;

    #[test]
    fn test_bundled_table_grants_super_admin() {
        let table = RbacConfig::default().load().unwrap();
        let role = Role::named("super_admin");
        assert!(table.allows(&role, "user.index"));
        assert!(table.allows(&role, "user.roles"));
        assert!(table.allows(&role, "upload-image.index"));
        assert!(table.allows(&role, "translations.destroy"));
        assert!(!table.allows(&role, "user.nonexistent-action"));
        assert!(!table.allows(&Role::named("editor"), "abouts.index"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let config = RbacConfig {
            path: Some(PathBuf::from("/definitely/not/here/rbac.json")),
        };
        assert!(config.load().is_err());
    }
}

//! Administration tasks run from `sitekit-cli`.

use anyhow::{Context, bail};
use chrono::Utc;
use serde_json::json;

use sitekit_core::PermissionTable;
use sitekit_core::password::hash_password;

use crate::modules::resources::model::{Attributes, ResourceKind};
use crate::modules::users::model::{NewUser, User, role_codes};
use crate::router::protected_route_names;
use crate::store::{ListQuery, ResourceStore, Store, UserStore};

/// Default UI strings, identical in every locale until translated.
pub const DEFAULT_TRANSLATION_KEYS: [&str; 3] = ["We are on Facebook", "shop", "ABOUT COMPANY"];

/// Creates a verified user holding the active `super_admin` role.
pub async fn create_super_admin(
    store: &dyn Store,
    email: &str,
    name: &str,
    surename: &str,
    password: &str,
    bcrypt_cost: u32,
) -> anyhow::Result<User> {
    if store.find_user_by_email(email).await?.is_some() {
        bail!("User with this email already exists");
    }

    let password_hash = hash_password(password, bcrypt_cost)?;
    let user = store
        .create_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            surename: surename.to_string(),
            password_hash,
            email_verified_at: Some(Utc::now()),
            role: Some(role_codes::SUPER_ADMIN.to_string()),
        })
        .await
        .context("Failed to create super admin")?;

    tracing::info!(user_id = user.id, "Super admin created");
    Ok(user)
}

/// Inserts each default translation unless an identical row exists.
/// Returns the number of inserted rows.
pub async fn seed_translations(store: &dyn Store) -> anyhow::Result<usize> {
    let mut inserted = 0;

    for key in DEFAULT_TRANSLATION_KEYS {
        let attributes = match json!({ "key": key, "uz": key, "ru": key, "en": key }) {
            serde_json::Value::Object(map) => map,
            _ => Attributes::new(),
        };

        let existing = store
            .list_resources(
                ResourceKind::Translation,
                &ListQuery {
                    filters: attributes.clone(),
                    window: None,
                },
            )
            .await?;
        if existing.total > 0 {
            tracing::debug!(key, "Translation already present");
            continue;
        }

        store
            .create_resource(ResourceKind::Translation, attributes)
            .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Translations seeded");
    Ok(inserted)
}

/// Permission entries that match no guarded route.
pub fn check_permissions(table: &PermissionTable) -> Vec<String> {
    let names = protected_route_names();
    table.unknown_entries(names.iter().map(String::as_str))
}

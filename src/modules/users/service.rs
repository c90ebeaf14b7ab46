use std::collections::BTreeMap;

use tracing::instrument;

use sitekit_core::password::hash_password;
use sitekit_core::{AppError, Paginated, PaginationMeta, PaginationParams};

use crate::modules::users::model::{
    CreateUserDto, NewUser, UpdateUserDto, User, UserChanges, role_codes,
};
use crate::store::{StoreError, UserStore, Window};

pub const EMAIL_TAKEN: &str = "The email has already been taken.";

pub struct UserService;

fn email_taken(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict(_) => AppError::invalid_field("email", EMAIL_TAKEN),
        other => other.into(),
    }
}

impl UserService {
    #[instrument(skip(store))]
    pub async fn paginated_list(
        store: &(impl UserStore + ?Sized),
        return_all: bool,
        pagination: &PaginationParams,
    ) -> Result<Paginated<User>, AppError> {
        if return_all {
            let listing = store.list_users(None).await?;
            return Ok(Paginated::all(listing.items));
        }

        let listing = store
            .list_users(Some(Window {
                limit: pagination.limit(),
                offset: pagination.offset(),
            }))
            .await?;

        let meta = PaginationMeta::for_page(pagination, listing.total);
        Ok(Paginated::page(listing.items, meta))
    }

    #[instrument(skip(store, dto), fields(email = %dto.email))]
    pub async fn create_model(
        store: &(impl UserStore + ?Sized),
        dto: CreateUserDto,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        if store.find_user_by_email(&dto.email).await?.is_some() {
            return Err(AppError::invalid_field("email", EMAIL_TAKEN));
        }

        let password_hash = hash_password(&dto.password, bcrypt_cost)?;

        let user = store
            .create_user(NewUser {
                email: dto.email,
                name: dto.name,
                surename: dto.surename,
                password_hash,
                email_verified_at: None,
                role: dto.role,
            })
            .await
            .map_err(email_taken)?;

        tracing::info!(user_id = user.id, role = ?user.active_role_code(), "User created");
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn get_model_by_id(store: &(impl UserStore + ?Sized), id: i64) -> Result<User, AppError> {
        Ok(store.get_user(id).await?)
    }

    /// Applies the supplied fields. A `role` becomes the single active role.
    #[instrument(skip(store, dto))]
    pub async fn update_model(
        store: &(impl UserStore + ?Sized),
        dto: UpdateUserDto,
        id: i64,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        if let Some(email) = dto.email.as_deref() {
            if let Some(existing) = store.find_user_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::invalid_field("email", EMAIL_TAKEN));
                }
            }
        }

        let password_hash = dto
            .password
            .as_deref()
            .map(|password| hash_password(password, bcrypt_cost))
            .transpose()?;

        let user = store
            .update_user(
                id,
                UserChanges {
                    email: dto.email,
                    name: dto.name,
                    surename: dto.surename,
                    password_hash,
                    role: dto.role,
                },
            )
            .await
            .map_err(email_taken)?;

        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn delete_model(store: &(impl UserStore + ?Sized), id: i64) -> Result<User, AppError> {
        let user = store.delete_user(id).await?;

        tracing::info!(user_id = user.id, "User deleted");
        Ok(user)
    }

    pub fn roles() -> BTreeMap<&'static str, &'static str> {
        role_codes::labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use sitekit_core::password::{MIN_COST, verify_password};

    fn create_dto(email: &str, role: Option<&str>) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            name: "Ali".to_string(),
            surename: "Valiyev".to_string(),
            password: "secret1".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_assigns_role() {
        let store = MemoryStore::new();
        let user = UserService::create_model(&store, create_dto("a@x.uz", Some("editor")), MIN_COST)
            .await
            .unwrap();

        assert_ne!(user.password, "secret1");
        assert!(verify_password("secret1", &user.password).unwrap());
        assert_eq!(user.active_role_code(), Some("editor"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_validation_error() {
        let store = MemoryStore::new();
        UserService::create_model(&store, create_dto("a@x.uz", None), MIN_COST)
            .await
            .unwrap();

        let err = UserService::create_model(&store, create_dto("a@x.uz", None), MIN_COST)
            .await
            .unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors["email"], vec![EMAIL_TAKEN.to_string()]);
    }

    #[tokio::test]
    async fn test_update_keeps_own_email_and_switches_role() {
        let store = MemoryStore::new();
        let user = UserService::create_model(&store, create_dto("a@x.uz", Some("user")), MIN_COST)
            .await
            .unwrap();

        let updated = UserService::update_model(
            &store,
            UpdateUserDto {
                email: Some("a@x.uz".to_string()),
                role: Some("moderator".to_string()),
                ..Default::default()
            },
            user.id,
            MIN_COST,
        )
        .await
        .unwrap();

        assert_eq!(updated.active_role_code(), Some("moderator"));
        assert_eq!(updated.name, "Ali");
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_user() {
        let store = MemoryStore::new();
        UserService::create_model(&store, create_dto("a@x.uz", None), MIN_COST)
            .await
            .unwrap();
        let other = UserService::create_model(&store, create_dto("b@x.uz", None), MIN_COST)
            .await
            .unwrap();

        let err = UserService::update_model(
            &store,
            UpdateUserDto {
                email: Some("a@x.uz".to_string()),
                ..Default::default()
            },
            other.id,
            MIN_COST,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = UserService::delete_model(&store, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

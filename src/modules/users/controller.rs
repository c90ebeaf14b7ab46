use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use sitekit_core::{AppError, Paginated};

use crate::modules::resources::model::ListParams;
use crate::modules::users::model::{CreateUserDto, RoleListResponse, UpdateUserDto, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::response::{Data, ErrorResponse};
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/user",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users with their role records", body = [User]),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 405, description = "Role lacks user.index", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<User>>, AppError> {
    let users =
        UserService::paginated_list(state.store(), params.return_all(), &params.pagination).await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 405, description = "Role lacks user.store", body = ErrorResponse),
        (status = 422, description = "Validation failed or email taken", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn store(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<Data<User>>), AppError> {
    let user =
        UserService::create_model(state.store(), dto, state.security_config.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(Data::new(user))))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 405, description = "Role lacks user.show", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<User>>, AppError> {
    let user = UserService::get_model_by_id(state.store(), id).await?;
    Ok(Json(Data::new(user)))
}

#[utoipa::path(
    patch,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 405, description = "Role lacks user.update", body = ErrorResponse),
        (status = 422, description = "Validation failed or email taken", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<Data<User>>, AppError> {
    let user =
        UserService::update_model(state.store(), dto, id, state.security_config.bcrypt_cost)
            .await?;
    Ok(Json(Data::new(user)))
}

#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 405, description = "Role lacks user.destroy", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<User>>, AppError> {
    let user = UserService::delete_model(state.store(), id).await?;
    Ok(Json(Data::new(user)))
}

#[utoipa::path(
    get,
    path = "/api/role",
    responses(
        (status = 200, description = "Role code to label mapping", body = RoleListResponse),
        (status = 405, description = "Role lacks user.roles", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn roles() -> Json<RoleListResponse> {
    Json(RoleListResponse {
        data: UserService::roles(),
    })
}

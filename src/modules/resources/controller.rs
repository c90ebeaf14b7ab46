//! Handlers shared by every content kind.
//!
//! Each handler is generic over a [`ResourceSchema`]; the router instantiates them
//! once per kind.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use sitekit_core::{AppError, Paginated};

use crate::modules::resources::model::{Attributes, ListParams, ResourceRecord, ResourceSchema};
use crate::modules::resources::service::ResourceService;
use crate::state::AppState;
use crate::utils::response::Data;
use crate::validator::ValidatedData;

#[instrument(skip(state), fields(kind = %R::KIND))]
pub async fn index<R: ResourceSchema>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<ResourceRecord>>, AppError> {
    let records = ResourceService::paginated_list(
        state.store(),
        R::KIND,
        Attributes::new(),
        params.return_all(),
        &params.pagination,
    )
    .await?;

    Ok(Json(records))
}

#[instrument(skip(state), fields(kind = %R::KIND))]
pub async fn store<R: ResourceSchema>(
    State(state): State<AppState>,
    ValidatedData(payload): ValidatedData<R::Create>,
) -> Result<(StatusCode, Json<Data<ResourceRecord>>), AppError> {
    let record = ResourceService::create_model::<R>(state.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(Data::new(record))))
}

#[instrument(skip(state), fields(kind = %R::KIND))]
pub async fn show<R: ResourceSchema>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<ResourceRecord>>, AppError> {
    let record = ResourceService::get_model_by_id(state.store(), R::KIND, id).await?;
    Ok(Json(Data::new(record)))
}

#[instrument(skip(state), fields(kind = %R::KIND))]
pub async fn update<R: ResourceSchema>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedData(payload): ValidatedData<R::Update>,
) -> Result<Json<Data<ResourceRecord>>, AppError> {
    let record = ResourceService::update_model::<R>(state.store(), payload, id).await?;
    Ok(Json(Data::new(record)))
}

#[instrument(skip(state), fields(kind = %R::KIND))]
pub async fn destroy<R: ResourceSchema>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<ResourceRecord>>, AppError> {
    let record = ResourceService::delete_model(state.store(), R::KIND, id).await?;
    Ok(Json(Data::new(record)))
}

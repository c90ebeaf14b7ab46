//! The uniform list/create/read/update/delete operations over every content kind.

use serde::Serialize;
use tracing::instrument;

use sitekit_core::{AppError, Paginated, PaginationMeta, PaginationParams};

use crate::modules::resources::model::{Attributes, ResourceKind, ResourceRecord, ResourceSchema};
use crate::store::{ListQuery, ResourceStore, Window};

pub struct ResourceService;

fn to_attributes<T: Serialize>(payload: &T) -> Result<Attributes, AppError> {
    match serde_json::to_value(payload) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::internal_error("Resource payload is not an object")),
        Err(e) => Err(AppError::internal_error(format!(
            "Failed to serialize resource payload: {}",
            e
        ))),
    }
}

impl ResourceService {
    /// Records matching `filters`, ordered by id.
    ///
    /// `return_all` skips pagination; otherwise one page is selected by `pagination`.
    #[instrument(skip(store))]
    pub async fn paginated_list(
        store: &(impl ResourceStore + ?Sized),
        kind: ResourceKind,
        filters: Attributes,
        return_all: bool,
        pagination: &PaginationParams,
    ) -> Result<Paginated<ResourceRecord>, AppError> {
        if return_all {
            let listing = store
                .list_resources(
                    kind,
                    &ListQuery {
                        filters,
                        window: None,
                    },
                )
                .await?;
            return Ok(Paginated::all(listing.items));
        }

        let listing = store
            .list_resources(
                kind,
                &ListQuery {
                    filters,
                    window: Some(Window {
                        limit: pagination.limit(),
                        offset: pagination.offset(),
                    }),
                },
            )
            .await?;

        let meta = PaginationMeta::for_page(pagination, listing.total);
        Ok(Paginated::page(listing.items, meta))
    }

    #[instrument(skip(store))]
    pub async fn create_model<R: ResourceSchema>(
        store: &(impl ResourceStore + ?Sized),
        payload: R::Create,
    ) -> Result<ResourceRecord, AppError> {
        let attributes = to_attributes(&payload)?;
        let record = store.create_resource(R::KIND, attributes).await?;

        tracing::info!(kind = %R::KIND, id = record.id, "Record created");
        Ok(record)
    }

    #[instrument(skip(store))]
    pub async fn get_model_by_id(
        store: &(impl ResourceStore + ?Sized),
        kind: ResourceKind,
        id: i64,
    ) -> Result<ResourceRecord, AppError> {
        Ok(store.get_resource(kind, id).await?)
    }

    /// Merges the supplied fields over the stored attributes.
    #[instrument(skip(store))]
    pub async fn update_model<R: ResourceSchema>(
        store: &(impl ResourceStore + ?Sized),
        payload: R::Update,
        id: i64,
    ) -> Result<ResourceRecord, AppError> {
        let changes = to_attributes(&payload)?;
        let mut attributes = store.get_resource(R::KIND, id).await?.attributes;
        attributes.extend(changes);

        let record = store.update_resource(R::KIND, id, attributes).await?;

        tracing::info!(kind = %R::KIND, id, "Record updated");
        Ok(record)
    }

    #[instrument(skip(store))]
    pub async fn delete_model(
        store: &(impl ResourceStore + ?Sized),
        kind: ResourceKind,
        id: i64,
    ) -> Result<ResourceRecord, AppError> {
        let record = store.delete_resource(kind, id).await?;

        tracing::info!(kind = %kind, id, "Record deleted");
        Ok(record)
    }
}

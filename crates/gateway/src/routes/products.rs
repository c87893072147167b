//! Product handlers.
//!
//! Product ids are chosen by the caller, so creation checks that the id is
//! still free before submitting.

use axum::{Json, extract::State};
use storechain_core::{MetadataBody, ProductId, ProductMetadata, ProductRecord, StoreId};

use super::{WriteResponse, submit};
use crate::chain::{Payload, PipelineError, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

fn product_intent(
    operation: WriteOperation,
    store_id: StoreId,
    product_id: ProductId,
    body: MetadataBody<ProductMetadata>,
) -> Result<WriteIntent> {
    let metadata = body.into_inner().map_err(PipelineError::from)?;
    Ok(WriteIntent::new(
        operation,
        vec![store_id.as_u64(), product_id.as_u64()],
        Payload::Product(metadata),
    ))
}

#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath((store_id, product_id)): ApiPath<(StoreId, ProductId)>,
    ApiJson(body): ApiJson<MetadataBody<ProductMetadata>>,
) -> Result<Json<WriteResponse>> {
    let intent = product_intent(WriteOperation::CreateProduct, store_id, product_id, body)?;
    submit(&state, intent).await
}

/// All products of a store.
#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
) -> Result<Json<Vec<ProductRecord>>> {
    Ok(Json(state.reader().products(store_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath((store_id, product_id)): ApiPath<(StoreId, ProductId)>,
) -> Result<Json<ProductRecord>> {
    Ok(Json(state.reader().product(store_id, product_id).await?))
}

#[tracing::instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((store_id, product_id)): ApiPath<(StoreId, ProductId)>,
    ApiJson(body): ApiJson<MetadataBody<ProductMetadata>>,
) -> Result<Json<WriteResponse>> {
    let intent = product_intent(WriteOperation::UpdateProduct, store_id, product_id, body)?;
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath((store_id, product_id)): ApiPath<(StoreId, ProductId)>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::DeleteProduct,
        vec![store_id.as_u64(), product_id.as_u64()],
        Payload::None,
    );
    submit(&state, intent).await
}

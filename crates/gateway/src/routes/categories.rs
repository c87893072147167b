//! Category handlers.

use axum::{Json, extract::State};
use storechain_core::{CategoryId, CategoryInput, CategoryRecord, StoreId};

use super::{WriteResponse, submit};
use crate::chain::{Payload, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

#[tracing::instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::AddCategory,
        vec![store_id.as_u64()],
        Payload::Category(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((store_id, category_id)): ApiPath<(StoreId, CategoryId)>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::UpdateCategory,
        vec![store_id.as_u64(), category_id.as_u64()],
        Payload::Category(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath((store_id, category_id)): ApiPath<(StoreId, CategoryId)>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::DeleteCategory,
        vec![store_id.as_u64(), category_id.as_u64()],
        Payload::None,
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath((store_id, category_id)): ApiPath<(StoreId, CategoryId)>,
) -> Result<Json<CategoryRecord>> {
    Ok(Json(state.reader().category(store_id, category_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
) -> Result<Json<Vec<CategoryRecord>>> {
    Ok(Json(state.reader().categories(store_id).await?))
}

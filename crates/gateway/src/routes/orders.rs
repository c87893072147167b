//! Order handlers.

use axum::{Json, extract::State};
use storechain_core::{OrderId, OrderInput, OrderRecord, StoreId};

use super::{WriteResponse, submit};
use crate::chain::{Payload, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

#[tracing::instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(_store_id): ApiPath<StoreId>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(WriteOperation::CreateOrder, Vec::new(), Payload::NewOrder(input));
    submit(&state, intent).await
}

#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((_store_id, order_id)): ApiPath<(StoreId, OrderId)>,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::UpdateOrder,
        vec![order_id.as_u64()],
        Payload::Order(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath((_store_id, order_id)): ApiPath<(StoreId, OrderId)>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::DeleteOrder,
        vec![order_id.as_u64()],
        Payload::None,
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath((store_id, order_id)): ApiPath<(StoreId, OrderId)>,
) -> Result<Json<OrderRecord>> {
    Ok(Json(state.reader().order(store_id, order_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
) -> Result<Json<Vec<OrderRecord>>> {
    Ok(Json(state.reader().orders(store_id).await?))
}

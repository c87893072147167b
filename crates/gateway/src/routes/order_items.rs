//! Order item handlers.

use axum::{Json, extract::State};
use storechain_core::{OrderId, OrderItemId, OrderItemInput, OrderItemRecord, StoreId};

use super::{WriteResponse, submit};
use crate::chain::{Payload, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

#[tracing::instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath((_store_id, order_id)): ApiPath<(StoreId, OrderId)>,
    ApiJson(input): ApiJson<OrderItemInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::AddOrderItem,
        vec![order_id.as_u64()],
        Payload::NewOrderItem(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((_store_id, order_item_id)): ApiPath<(StoreId, OrderItemId)>,
    ApiJson(input): ApiJson<OrderItemInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::UpdateOrderItem,
        vec![order_item_id.as_u64()],
        Payload::OrderItem(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath((_store_id, order_item_id)): ApiPath<(StoreId, OrderItemId)>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::DeleteOrderItem,
        vec![order_item_id.as_u64()],
        Payload::None,
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath((_store_id, order_item_id)): ApiPath<(StoreId, OrderItemId)>,
) -> Result<Json<OrderItemRecord>> {
    Ok(Json(state.reader().order_item(order_item_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath((_store_id, order_id)): ApiPath<(StoreId, OrderId)>,
) -> Result<Json<Vec<OrderItemRecord>>> {
    Ok(Json(state.reader().order_items(order_id).await?))
}

//! Customer handlers.
//!
//! Customer writes are addressed by customer id alone; the store id in the
//! path only scopes reads.

use axum::{Json, extract::State};
use storechain_core::{CustomerId, CustomerInput, CustomerRecord, StoreId};

use super::{WriteResponse, submit};
use crate::chain::{Payload, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

#[tracing::instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(_store_id): ApiPath<StoreId>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(WriteOperation::AddCustomer, Vec::new(), Payload::Customer(input));
    submit(&state, intent).await
}

#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath((_store_id, customer_id)): ApiPath<(StoreId, CustomerId)>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::UpdateCustomer,
        vec![customer_id.as_u64()],
        Payload::Customer(input),
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath((_store_id, customer_id)): ApiPath<(StoreId, CustomerId)>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(
        WriteOperation::DeleteCustomer,
        vec![customer_id.as_u64()],
        Payload::None,
    );
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath((store_id, customer_id)): ApiPath<(StoreId, CustomerId)>,
) -> Result<Json<CustomerRecord>> {
    Ok(Json(state.reader().customer(store_id, customer_id).await?))
}

#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<StoreId>,
) -> Result<Json<Vec<CustomerRecord>>> {
    Ok(Json(state.reader().customers(store_id).await?))
}

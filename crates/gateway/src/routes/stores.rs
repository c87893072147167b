//! Storefront handlers.
//!
//! A storefront belongs to the account that created it, and the gateway can
//! only act for its own signing account: every handler here first checks
//! that the address in the path is that account.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use storechain_core::{MetadataBody, StorefrontMetadata};

use super::{WriteResponse, submit};
use crate::chain::{Payload, PipelineError, WriteIntent, WriteOperation};
use crate::error::{ApiJson, ApiPath, Result};
use crate::state::AppState;

fn storefront_intent(
    state: &AppState,
    operation: WriteOperation,
    user_address: String,
    body: MetadataBody<StorefrontMetadata>,
) -> Result<WriteIntent> {
    state.pipeline().authorize(&user_address)?;
    let metadata = body.into_inner().map_err(PipelineError::from)?;
    Ok(WriteIntent::new(operation, Vec::new(), Payload::Storefront(metadata)).claimed_by(user_address))
}

/// Create the signing account's storefront.
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiPath(user_address): ApiPath<String>,
    ApiJson(body): ApiJson<MetadataBody<StorefrontMetadata>>,
) -> Result<Json<WriteResponse>> {
    let intent = storefront_intent(&state, WriteOperation::CreateStorefront, user_address, body)?;
    submit(&state, intent).await
}

/// Show the signing account's storefront metadata.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(user_address): ApiPath<String>,
) -> Result<Json<Value>> {
    let account = state.pipeline().authorize(&user_address)?;
    let storefront = state.reader().storefront(account).await?;
    Ok(Json(json!({ "data": storefront.metadata })))
}

#[tracing::instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(user_address): ApiPath<String>,
    ApiJson(body): ApiJson<MetadataBody<StorefrontMetadata>>,
) -> Result<Json<WriteResponse>> {
    let intent = storefront_intent(&state, WriteOperation::UpdateStorefront, user_address, body)?;
    submit(&state, intent).await
}

#[tracing::instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(user_address): ApiPath<String>,
) -> Result<Json<WriteResponse>> {
    let intent = WriteIntent::new(WriteOperation::DeleteStorefront, Vec::new(), Payload::None)
        .claimed_by(user_address);
    submit(&state, intent).await
}

//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! # Storefronts (bound to the signing account)
//! POST   /api/createStorefront/{userAddress}
//! GET    /api/getStorefront/{userAddress}
//! PUT    /api/updateStorefront/{userAddress}
//! DELETE /api/deleteStorefront/{userAddress}
//!
//! # Products
//! POST   /api/createProduct/{storeId}/{productId}
//! GET    /api/products/{storeId}
//! GET    /api/products/{storeId}/{productId}
//! PUT    /api/updateProduct/{storeId}/{productId}
//! DELETE /api/deleteProduct/{storeId}/{productId}
//!
//! # Categories
//! POST   /api/addCategory/{storeId}
//! PUT    /api/updateCategory/{storeId}/{categoryId}
//! DELETE /api/deleteCategory/{storeId}/{categoryId}
//! GET    /api/getCategory/{storeId}/{categoryId}
//! GET    /api/getAllCategories/{storeId}
//!
//! # Customers
//! POST   /api/addCustomer/{storeId}
//! PUT    /api/updateCustomer/{storeId}/{customerId}
//! DELETE /api/deleteCustomer/{storeId}/{customerId}
//! GET    /api/getCustomer/{storeId}/{customerId}
//! GET    /api/getAllCustomers/{storeId}
//!
//! # Orders
//! POST   /api/createOrder/{storeId}
//! PUT    /api/updateOrder/{storeId}/{orderId}
//! DELETE /api/deleteOrder/{storeId}/{orderId}
//! GET    /api/getOrder/{storeId}/{orderId}
//! GET    /api/getAllOrders/{storeId}
//!
//! # Order items
//! POST   /api/addOrderItem/{storeId}/{orderId}
//! PUT    /api/updateOrderItem/{storeId}/{orderItemId}
//! DELETE /api/deleteOrderItem/{storeId}/{orderItemId}
//! GET    /api/getOrderItem/{storeId}/{orderItemId}
//! GET    /api/getOrderItems/{storeId}/{orderId}
//! ```
//!
//! Writes answer `{"message", "transactionHash"}` once the transaction is
//! confirmed.

pub mod categories;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod stores;

use alloy::primitives::TxHash;
use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::chain::{WriteIntent, WriteReceipt};
use crate::error::Result;
use crate::state::AppState;

/// Body returned for a confirmed write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    pub message: &'static str,
    pub transaction_hash: TxHash,
}

impl From<WriteReceipt> for WriteResponse {
    fn from(receipt: WriteReceipt) -> Self {
        Self {
            message: receipt.message,
            transaction_hash: receipt.tx_hash,
        }
    }
}

/// Run `intent` through the pipeline and shape the reply.
async fn submit(state: &AppState, intent: WriteIntent) -> Result<Json<WriteResponse>> {
    let receipt = state.pipeline().execute(intent).await?;
    Ok(Json(receipt.into()))
}

/// Create the storefront routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/createStorefront/{user_address}", post(stores::create))
        .route("/getStorefront/{user_address}", get(stores::show))
        .route("/updateStorefront/{user_address}", put(stores::update))
        .route("/deleteStorefront/{user_address}", delete(stores::destroy))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/createProduct/{store_id}/{product_id}", post(products::create))
        .route("/products/{store_id}", get(products::index))
        .route("/products/{store_id}/{product_id}", get(products::show))
        .route("/updateProduct/{store_id}/{product_id}", put(products::update))
        .route("/deleteProduct/{store_id}/{product_id}", delete(products::destroy))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/addCategory/{store_id}", post(categories::create))
        .route("/updateCategory/{store_id}/{category_id}", put(categories::update))
        .route("/deleteCategory/{store_id}/{category_id}", delete(categories::destroy))
        .route("/getCategory/{store_id}/{category_id}", get(categories::show))
        .route("/getAllCategories/{store_id}", get(categories::index))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/addCustomer/{store_id}", post(customers::create))
        .route("/updateCustomer/{store_id}/{customer_id}", put(customers::update))
        .route("/deleteCustomer/{store_id}/{customer_id}", delete(customers::destroy))
        .route("/getCustomer/{store_id}/{customer_id}", get(customers::show))
        .route("/getAllCustomers/{store_id}", get(customers::index))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/createOrder/{store_id}", post(orders::create))
        .route("/updateOrder/{store_id}/{order_id}", put(orders::update))
        .route("/deleteOrder/{store_id}/{order_id}", delete(orders::destroy))
        .route("/getOrder/{store_id}/{order_id}", get(orders::show))
        .route("/getAllOrders/{store_id}", get(orders::index))
}

/// Create the order item routes router.
pub fn order_item_routes() -> Router<AppState> {
    Router::new()
        .route("/addOrderItem/{store_id}/{order_id}", post(order_items::create))
        .route("/updateOrderItem/{store_id}/{order_item_id}", put(order_items::update))
        .route("/deleteOrderItem/{store_id}/{order_item_id}", delete(order_items::destroy))
        .route("/getOrderItem/{store_id}/{order_item_id}", get(order_items::show))
        .route("/getOrderItems/{store_id}/{order_id}", get(order_items::index))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(store_routes())
        .merge(product_routes())
        .merge(category_routes())
        .merge(customer_routes())
        .merge(order_routes())
        .merge(order_item_routes());

    Router::new().nest("/api", api)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn write_response_uses_camel_case_hash_field() {
        let receipt = WriteReceipt {
            tx_hash: TxHash::repeat_byte(0xab),
            nonce: 4,
            block_number: Some(10),
            gas_used: 21_000,
            contract_address: None,
            message: "Product created successfully",
        };

        let body = serde_json::to_value(WriteResponse::from(receipt)).unwrap();

        assert_eq!(body["message"], "Product created successfully");
        assert_eq!(
            body["transactionHash"],
            format!("0x{}", "ab".repeat(32))
        );
        assert!(body.get("nonce").is_none());
    }
}

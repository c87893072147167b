//! Entity records as returned by the read endpoints.
//!
//! The chain is the only source of truth; these are decoded snapshots of
//! contract state and are never stored locally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::amount::TokenAmount;
use super::id::{CategoryId, CustomerId, OrderId, OrderItemId, ProductId, StoreId};
use super::status::OrderStatus;

/// A storefront: its owner and the metadata it was created with.
///
/// `metadata` is the parsed JSON document; metadata that was written as a
/// plain string comes back as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontRecord {
    pub owner: String,
    pub metadata: Value,
}

impl StorefrontRecord {
    /// Build a record from the raw on-chain metadata string.
    #[must_use]
    pub fn from_raw(owner: String, raw_metadata: &str) -> Self {
        let metadata = serde_json::from_str(raw_metadata)
            .unwrap_or_else(|_| Value::String(raw_metadata.to_string()));
        Self { owner, metadata }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: TokenAmount,
    pub image: String,
    pub stock: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    pub parent_id: CategoryId,
}

/// A customer. Credentials are never part of a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub store_id: StoreId,
    pub email: String,
    pub name: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub store_id: StoreId,
    pub customer_id: CustomerId,
    pub order_status: OrderStatus,
    pub subtotal: TokenAmount,
    pub tax: TokenAmount,
    pub shipping_cost: TokenAmount,
    pub total: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u64,
    pub price: TokenAmount,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storefront_metadata_is_parsed() {
        let record = StorefrontRecord::from_raw(
            "0xabc".to_string(),
            r#"{"name":"Acme","description":"Shop"}"#,
        );
        assert_eq!(record.metadata["name"], "Acme");
    }

    #[test]
    fn test_storefront_plain_text_metadata_is_kept() {
        let record = StorefrontRecord::from_raw("0xabc".to_string(), "just text");
        assert_eq!(record.metadata, json!("just text"));
    }

    #[test]
    fn test_order_record_json_shape() {
        let order = OrderRecord {
            id: OrderId::new(1),
            store_id: StoreId::new(2),
            customer_id: CustomerId::new(3),
            order_status: OrderStatus::Processing,
            subtotal: TokenAmount::new(100),
            tax: TokenAmount::new(8),
            shipping_cost: TokenAmount::new(5),
            total: TokenAmount::new(113),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "storeId": 2,
                "customerId": 3,
                "orderStatus": "processing",
                "subtotal": "100",
                "tax": "8",
                "shippingCost": "5",
                "total": "113"
            })
        );
    }
}

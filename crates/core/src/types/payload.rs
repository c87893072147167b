//! Request payloads for write operations.
//!
//! These are the JSON bodies accepted by the gateway's write endpoints. Each
//! payload knows which of its fields the contract needs filled in; checking
//! them here keeps invalid writes from ever reaching the chain.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::amount::TokenAmount;
use super::id::{CategoryId, CustomerId, ProductId};
use super::status::OrderStatus;

/// Errors raised when a write payload is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata is missing")]
    Missing,

    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error("field `{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("metadata could not be serialized: {0}")]
    Serialize(String),
}

/// JSON truthiness, matching what clients of the storefront API expect
/// "present" to mean.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

fn require_text(value: &str, field: &'static str) -> Result<(), MetadataError> {
    if value.trim().is_empty() {
        Err(MetadataError::MissingField(field))
    } else {
        Ok(())
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A body of the form `{"metadata": {...}}`.
///
/// `metaData` is accepted as an alias since older clients send it.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataBody<T> {
    #[serde(default, alias = "metaData")]
    pub metadata: Option<T>,
}

impl<T> MetadataBody<T> {
    /// Take the metadata out of the envelope.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Missing` if the body carried no metadata.
    pub fn into_inner(self) -> Result<T, MetadataError> {
        self.metadata.ok_or(MetadataError::Missing)
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// Free-form storefront metadata.
///
/// Stored on-chain as a single JSON string; only `name` and `description`
/// are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorefrontMetadata(Map<String, Value>);

impl StorefrontMetadata {
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::MissingField` naming the first absent field.
    pub fn validate(&self) -> Result<(), MetadataError> {
        for field in ["name", "description"] {
            if !is_present(self.0.get(field)) {
                return Err(MetadataError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Serialize to the string argument the contract stores.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Serialize` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, MetadataError> {
        serde_json::to_string(&self.0).map_err(|e| MetadataError::Serialize(e.to_string()))
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product fields for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductMetadata {
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Option<TokenAmount>,
    pub image: String,
    pub stock: Option<u64>,
}

impl ProductMetadata {
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the category is zero.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.category_id.is_sentinel() {
            return Err(MetadataError::MissingField("categoryId"));
        }
        require_text(&self.name, "name")?;
        require_text(&self.description, "description")?;
        if self.price.is_none() {
            return Err(MetadataError::MissingField("price"));
        }
        require_text(&self.image, "image")?;
        if self.stock.is_none() {
            return Err(MetadataError::MissingField("stock"));
        }
        Ok(())
    }
}

// =============================================================================
// Category
// =============================================================================

/// Body for adding or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    /// Parent category, or zero for a top-level category.
    pub parent_id: CategoryId,
}

impl CategoryInput {
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn validate(&self) -> Result<(), MetadataError> {
        require_text(&self.name, "name")
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Body for adding or updating a customer.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub shipping_address: String,
    pub billing_address: String,
    pub phone_number: String,
}

impl CustomerInput {
    /// # Errors
    ///
    /// Returns an error if the email or name is empty.
    pub fn validate(&self) -> Result<(), MetadataError> {
        require_text(&self.email, "email")?;
        require_text(&self.name, "name")
    }
}

impl std::fmt::Debug for CustomerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerInput")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .field("shipping_address", &self.shipping_address)
            .field("billing_address", &self.billing_address)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

// =============================================================================
// Order
// =============================================================================

/// Body for creating or updating an order.
///
/// `customerId` is only read on creation; updates address the order by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    pub customer_id: CustomerId,
    #[serde(deserialize_with = "status_from_code_or_name")]
    pub order_status: OrderStatus,
    pub subtotal: Option<TokenAmount>,
    pub tax: Option<TokenAmount>,
    pub shipping_cost: Option<TokenAmount>,
    pub total: Option<TokenAmount>,
}

/// Order status arrives either as its on-chain code (`2`) or its name (`"shipped"`).
fn status_from_code_or_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<OrderStatus, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Code(u8),
        Name(OrderStatus),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Code(code) => OrderStatus::try_from(code)
            .map_err(|code| serde::de::Error::custom(format!("unknown order status {code}"))),
        Raw::Name(status) => Ok(status),
    }
}

impl OrderInput {
    /// # Errors
    ///
    /// Returns an error if the customer is zero or an amount is missing.
    pub fn validate_for_create(&self) -> Result<(), MetadataError> {
        if self.customer_id.is_sentinel() {
            return Err(MetadataError::MissingField("customerId"));
        }
        self.validate_amounts()
    }

    /// # Errors
    ///
    /// Returns an error if an amount is missing.
    pub fn validate_for_update(&self) -> Result<(), MetadataError> {
        self.validate_amounts()
    }

    fn validate_amounts(&self) -> Result<(), MetadataError> {
        let amounts = [
            (self.subtotal, "subtotal"),
            (self.tax, "tax"),
            (self.shipping_cost, "shippingCost"),
            (self.total, "total"),
        ];
        for (amount, field) in amounts {
            if amount.is_none() {
                return Err(MetadataError::MissingField(field));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Order item
// =============================================================================

/// Body for adding or updating an order item.
///
/// `productId` is only read when adding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u64,
    pub price: Option<TokenAmount>,
}

impl OrderItemInput {
    /// # Errors
    ///
    /// Returns an error if the product is zero, the quantity is zero, or the
    /// price is missing.
    pub fn validate_for_add(&self) -> Result<(), MetadataError> {
        if self.product_id.is_sentinel() {
            return Err(MetadataError::MissingField("productId"));
        }
        self.validate_for_update()
    }

    /// # Errors
    ///
    /// Returns an error if the quantity is zero or the price is missing.
    pub fn validate_for_update(&self) -> Result<(), MetadataError> {
        if self.quantity == 0 {
            return Err(MetadataError::Zero("quantity"));
        }
        if self.price.is_none() {
            return Err(MetadataError::MissingField("price"));
        }
        Ok(())
    }
}

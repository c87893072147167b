//! Write intents: one requested state change, before it becomes a transaction.

use alloy::dyn_abi::DynSolValue;

use storechain_core::{
    CategoryInput, CustomerInput, MetadataError, OrderInput, OrderItemInput, ProductMetadata,
    StorefrontMetadata, TokenAmount,
};

use super::encoder::{text, uint, uint8};
use super::operations::WriteOperation;

/// Body of a write, by shape.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Deletes carry no body.
    None,
    Storefront(StorefrontMetadata),
    Product(ProductMetadata),
    Category(CategoryInput),
    Customer(CustomerInput),
    /// Order creation; the customer id is part of the call.
    NewOrder(OrderInput),
    Order(OrderInput),
    /// Adding an item; the product id is part of the call.
    NewOrderItem(OrderItemInput),
    OrderItem(OrderItemInput),
}

fn amount(value: Option<TokenAmount>) -> DynSolValue {
    uint(value.unwrap_or_default().as_u128())
}

impl Payload {
    /// Check that the fields the contract needs are filled in.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn validate(&self) -> Result<(), MetadataError> {
        match self {
            Self::None => Ok(()),
            Self::Storefront(metadata) => metadata.validate(),
            Self::Product(metadata) => metadata.validate(),
            Self::Category(input) => input.validate(),
            Self::Customer(input) => input.validate(),
            Self::NewOrder(input) => input.validate_for_create(),
            Self::Order(input) => input.validate_for_update(),
            Self::NewOrderItem(input) => input.validate_for_add(),
            Self::OrderItem(input) => input.validate_for_update(),
        }
    }

    /// Contract arguments following the intent's keys.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Serialize` if storefront metadata cannot be
    /// turned into its string form.
    pub fn args(&self) -> Result<Vec<DynSolValue>, MetadataError> {
        let args = match self {
            Self::None => Vec::new(),
            Self::Storefront(metadata) => vec![text(metadata.to_json_string()?)],
            Self::Product(p) => vec![
                uint(p.category_id.as_u64()),
                text(p.name.as_str()),
                text(p.description.as_str()),
                amount(p.price),
                text(p.image.as_str()),
                uint(p.stock.unwrap_or_default()),
            ],
            Self::Category(c) => vec![
                text(c.name.as_str()),
                text(c.description.as_str()),
                uint(c.parent_id.as_u64()),
            ],
            Self::Customer(c) => vec![
                text(c.email.as_str()),
                text(c.name.as_str()),
                text(c.password.as_str()),
                text(c.shipping_address.as_str()),
                text(c.billing_address.as_str()),
                text(c.phone_number.as_str()),
            ],
            Self::NewOrder(o) => {
                let mut args = vec![uint(o.customer_id.as_u64())];
                args.extend(order_fields(o));
                args
            }
            Self::Order(o) => order_fields(o),
            Self::NewOrderItem(i) => vec![
                uint(i.product_id.as_u64()),
                uint(i.quantity),
                amount(i.price),
            ],
            Self::OrderItem(i) => vec![uint(i.quantity), amount(i.price)],
        };
        Ok(args)
    }
}

fn order_fields(o: &OrderInput) -> Vec<DynSolValue> {
    vec![
        uint8(o.order_status.as_u8()),
        amount(o.subtotal),
        amount(o.tax),
        amount(o.shipping_cost),
        amount(o.total),
    ]
}

/// A requested state change.
///
/// `keys` are the leading `uint256` arguments that address the entity
/// (store id, entity id) in the order the contract expects them.
#[derive(Debug, Clone)]
pub struct WriteIntent {
    pub operation: WriteOperation,
    /// Account the caller says it acts for; checked against the signer.
    /// `None` for operations that are not bound to a caller-named account.
    pub claimed_account: Option<String>,
    pub keys: Vec<u64>,
    pub payload: Payload,
}

impl WriteIntent {
    #[must_use]
    pub const fn new(operation: WriteOperation, keys: Vec<u64>, payload: Payload) -> Self {
        Self {
            operation,
            claimed_account: None,
            keys,
            payload,
        }
    }

    /// Bind the intent to the account named in the request.
    #[must_use]
    pub fn claimed_by(mut self, account: impl Into<String>) -> Self {
        self.claimed_account = Some(account.into());
        self
    }

    /// Positional contract arguments: keys first, then the payload.
    ///
    /// # Errors
    ///
    /// As [`Payload::args`].
    pub fn args(&self) -> Result<Vec<DynSolValue>, MetadataError> {
        let mut args: Vec<DynSolValue> = self.keys.iter().map(|&key| uint(key)).collect();
        args.extend(self.payload.args()?);
        Ok(args)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use alloy::primitives::U256;
    use serde_json::json;
    use storechain_core::{CategoryId, CustomerId, OrderStatus, ProductId};

    use super::*;
    use crate::chain::encoder::CallEncoder;

    #[test]
    fn test_product_args_follow_the_keys() {
        let intent = WriteIntent::new(
            WriteOperation::CreateProduct,
            vec![1, 42],
            Payload::Product(ProductMetadata {
                category_id: CategoryId::new(3),
                name: "Mug".into(),
                description: "Ceramic".into(),
                price: Some(TokenAmount::new(1_500)),
                image: "mug.png".into(),
                stock: Some(0),
            }),
        );
        let args = intent.args().unwrap();
        assert_eq!(args.len(), 8);
        assert_eq!(args[1], uint(42u64));
        assert_eq!(args[2], uint(3u64));
        assert_eq!(args[7], DynSolValue::Uint(U256::ZERO, 256));
        assert!(CallEncoder::default().encode(intent.operation, &args).is_ok());
    }

    #[test]
    fn test_new_order_leads_with_customer() {
        let intent = WriteIntent::new(
            WriteOperation::CreateOrder,
            Vec::new(),
            Payload::NewOrder(OrderInput {
                customer_id: CustomerId::new(4),
                order_status: OrderStatus::Shipped,
                subtotal: Some(TokenAmount::new(100)),
                tax: Some(TokenAmount::new(8)),
                shipping_cost: Some(TokenAmount::new(5)),
                total: Some(TokenAmount::new(113)),
            }),
        );
        let args = intent.args().unwrap();
        assert_eq!(args[0], uint(4u64));
        assert_eq!(args[1], uint8(2));
        assert!(CallEncoder::default().encode(intent.operation, &args).is_ok());
    }

    #[test]
    fn test_order_item_update_has_no_product() {
        let intent = WriteIntent::new(
            WriteOperation::UpdateOrderItem,
            vec![7],
            Payload::OrderItem(OrderItemInput {
                product_id: ProductId::new(9),
                quantity: 2,
                price: Some(TokenAmount::new(300)),
            }),
        );
        let args = intent.args().unwrap();
        assert_eq!(args, vec![uint(7u64), uint(2u64), uint(300u128)]);
    }

    #[test]
    fn test_storefront_metadata_becomes_one_string() {
        let metadata: StorefrontMetadata =
            serde_json::from_value(json!({"name": "Acme", "description": "Shop"})).unwrap();
        let intent = WriteIntent::new(
            WriteOperation::CreateStorefront,
            Vec::new(),
            Payload::Storefront(metadata),
        )
        .claimed_by("0xabc");
        let args = intent.args().unwrap();
        assert_eq!(args.len(), 1);
        assert!(matches!(&args[0], DynSolValue::String(s) if s.contains("\"Acme\"")));
        assert_eq!(intent.claimed_account.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_validation_dispatches_by_shape() {
        let missing_customer = Payload::NewOrder(OrderInput::default());
        assert_eq!(
            missing_customer.validate(),
            Err(MetadataError::MissingField("customerId"))
        );
        let zero_quantity = Payload::OrderItem(OrderItemInput {
            price: Some(TokenAmount::new(1)),
            ..OrderItemInput::default()
        });
        assert_eq!(zero_quantity.validate(), Err(MetadataError::Zero("quantity")));
        assert!(Payload::None.validate().is_ok());
    }
}

//! Read path: call-and-decode queries against the storefront contract.
//!
//! The contract answers lookups for missing entities with zeroed structs
//! rather than reverting. Those sentinels (id 0, empty metadata) are turned
//! into [`ReadError::NotFound`] here so callers never see them.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use tracing::instrument;

use storechain_core::{
    CategoryId, CategoryRecord, CustomerId, CustomerRecord, OrderId, OrderItemId,
    OrderItemRecord, OrderRecord, OrderStatus, ProductId, ProductRecord, StoreId,
    StorefrontRecord, TokenAmount,
};

use super::client::ChainRpc;
use super::contract::IStorefront;
use super::error::{ChainError, Entity, ReadError};

fn decode_error(what: &str) -> ReadError {
    ReadError::Query(ChainError::Decode(format!("{what} out of range")))
}

fn to_u64(value: U256, what: &str) -> Result<u64, ReadError> {
    u64::try_from(value).map_err(|_| decode_error(what))
}

fn to_amount(value: U256, what: &str) -> Result<TokenAmount, ReadError> {
    u128::try_from(value)
        .map(TokenAmount::new)
        .map_err(|_| decode_error(what))
}

// =============================================================================
// Record conversion
// =============================================================================

fn product_record(p: IStorefront::Product) -> Result<ProductRecord, ReadError> {
    Ok(ProductRecord {
        id: ProductId::new(to_u64(p.id, "product id")?),
        store_id: StoreId::new(to_u64(p.storeId, "store id")?),
        category_id: CategoryId::new(to_u64(p.categoryId, "category id")?),
        name: p.name,
        description: p.description,
        price: to_amount(p.price, "price")?,
        image: p.image,
        stock: to_u64(p.stock, "stock")?,
    })
}

fn category_record(c: IStorefront::Category) -> Result<CategoryRecord, ReadError> {
    Ok(CategoryRecord {
        id: CategoryId::new(to_u64(c.id, "category id")?),
        store_id: StoreId::new(to_u64(c.storeId, "store id")?),
        name: c.name,
        description: c.description,
        parent_id: CategoryId::new(to_u64(c.parentId, "parent id")?),
    })
}

fn customer_record(c: IStorefront::Customer) -> Result<CustomerRecord, ReadError> {
    Ok(CustomerRecord {
        id: CustomerId::new(to_u64(c.id, "customer id")?),
        store_id: StoreId::new(to_u64(c.storeId, "store id")?),
        email: c.email,
        name: c.name,
        shipping_address: c.shippingAddress,
        billing_address: c.billingAddress,
        phone_number: c.phoneNumber,
    })
}

fn order_record(o: IStorefront::Order) -> Result<OrderRecord, ReadError> {
    Ok(OrderRecord {
        id: OrderId::new(to_u64(o.id, "order id")?),
        store_id: StoreId::new(to_u64(o.storeId, "store id")?),
        customer_id: CustomerId::new(to_u64(o.customerId, "customer id")?),
        order_status: OrderStatus::try_from(o.orderStatus)
            .map_err(|_| decode_error("order status"))?,
        subtotal: to_amount(o.subtotal, "subtotal")?,
        tax: to_amount(o.tax, "tax")?,
        shipping_cost: to_amount(o.shippingCost, "shipping cost")?,
        total: to_amount(o.total, "total")?,
    })
}

fn order_item_record(i: IStorefront::OrderItem) -> Result<OrderItemRecord, ReadError> {
    Ok(OrderItemRecord {
        id: OrderItemId::new(to_u64(i.id, "order item id")?),
        order_id: OrderId::new(to_u64(i.orderId, "order id")?),
        product_id: ProductId::new(to_u64(i.productId, "product id")?),
        quantity: to_u64(i.quantity, "quantity")?,
        price: to_amount(i.price, "price")?,
    })
}

/// Convert a list, dropping zeroed (deleted) slots.
fn live_records<T, R>(
    items: Vec<T>,
    id: impl Fn(&T) -> U256,
    convert: impl Fn(T) -> Result<R, ReadError>,
) -> Result<Vec<R>, ReadError> {
    items
        .into_iter()
        .filter(|item| !id(item).is_zero())
        .map(convert)
        .collect()
}

// =============================================================================
// ReadPath
// =============================================================================

/// Read-only queries against one deployed contract.
#[derive(Clone)]
pub struct ReadPath {
    chain: Arc<dyn ChainRpc>,
    contract: Address,
}

impl std::fmt::Debug for ReadPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadPath")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl ReadPath {
    #[must_use]
    pub fn new(chain: Arc<dyn ChainRpc>, contract: Address) -> Self {
        Self { chain, contract }
    }

    #[must_use]
    pub const fn contract(&self) -> Address {
        self.contract
    }

    async fn query<C: SolCall>(&self, call: &C) -> Result<C::Return, ReadError> {
        let output = self
            .chain
            .call(self.contract, Bytes::from(call.abi_encode()))
            .await?;
        C::abi_decode_returns(&output)
            .map_err(|e| ReadError::Query(ChainError::Decode(e.to_string())))
    }

    /// Chain id reported by the node.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the node is unreachable.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        self.chain.chain_id().await
    }

    /// # Errors
    ///
    /// Returns `ReadError::Query` if the call fails.
    #[instrument(skip(self), fields(%owner))]
    pub async fn has_store(&self, owner: Address) -> Result<bool, ReadError> {
        self.query(&IStorefront::hasStoreCall { owner }).await
    }

    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::Store)` if `account` has no store.
    #[instrument(skip(self), fields(%account))]
    pub async fn storefront(&self, account: Address) -> Result<StorefrontRecord, ReadError> {
        let found = self.query(&IStorefront::getStorefrontCall { account }).await?;
        if found.metadata.is_empty() {
            return Err(ReadError::NotFound(Entity::Store));
        }
        Ok(StorefrontRecord::from_raw(
            found.owner.to_checksum(None),
            &found.metadata,
        ))
    }

    /// Product `product_id` of `store_id`, found by scanning the store's slots.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::Product)` if no live slot holds it.
    #[instrument(skip(self), fields(%store_id, %product_id))]
    pub async fn product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<ProductRecord, ReadError> {
        match self.find_product(store_id, product_id).await? {
            Some(product) => product_record(product),
            None => Err(ReadError::NotFound(Entity::Product)),
        }
    }

    /// Whether `product_id` is already taken in `store_id`.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::Query` if a call fails.
    pub async fn product_exists(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<bool, ReadError> {
        Ok(self.find_product(store_id, product_id).await?.is_some())
    }

    async fn product_count(&self, store_id: StoreId) -> Result<u64, ReadError> {
        let count = self
            .query(&IStorefront::getProductCountForStoreCall {
                storeId: U256::from(store_id.as_u64()),
            })
            .await?;
        to_u64(count, "product count")
    }

    /// The product in slot `index` of the store's list; zeroed if deleted.
    async fn product_slot(
        &self,
        store_id: StoreId,
        index: u64,
    ) -> Result<IStorefront::Product, ReadError> {
        self.query(&IStorefront::getProductForStoreCall {
            storeId: U256::from(store_id.as_u64()),
            index: U256::from(index),
        })
        .await
    }

    async fn find_product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<Option<IStorefront::Product>, ReadError> {
        if product_id.is_sentinel() {
            return Ok(None);
        }
        let wanted = U256::from(product_id.as_u64());
        for index in 0..self.product_count(store_id).await? {
            let product = self.product_slot(store_id, index).await?;
            if product.id == wanted {
                return Ok(Some(product));
            }
        }
        Ok(None)
    }

    /// All products of a store, read one slot at a time.
    ///
    /// # Errors
    ///
    /// Returns `ReadError::Query` if any call fails.
    #[instrument(skip(self), fields(%store_id))]
    pub async fn products(&self, store_id: StoreId) -> Result<Vec<ProductRecord>, ReadError> {
        let mut products = Vec::new();
        for index in 0..self.product_count(store_id).await? {
            let product = self.product_slot(store_id, index).await?;
            if !product.id.is_zero() {
                products.push(product_record(product)?);
            }
        }
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::Category)` for the zero sentinel.
    #[instrument(skip(self), fields(%store_id, %category_id))]
    pub async fn category(
        &self,
        store_id: StoreId,
        category_id: CategoryId,
    ) -> Result<CategoryRecord, ReadError> {
        let category = self
            .query(&IStorefront::getCategoryCall {
                storeId: U256::from(store_id.as_u64()),
                categoryId: U256::from(category_id.as_u64()),
            })
            .await?;
        if category.id.is_zero() {
            return Err(ReadError::NotFound(Entity::Category));
        }
        category_record(category)
    }

    /// # Errors
    ///
    /// Returns `ReadError::Query` if the call fails.
    #[instrument(skip(self), fields(%store_id))]
    pub async fn categories(&self, store_id: StoreId) -> Result<Vec<CategoryRecord>, ReadError> {
        let categories = self
            .query(&IStorefront::getAllCategoriesCall {
                storeId: U256::from(store_id.as_u64()),
            })
            .await?;
        live_records(categories, |c| c.id, category_record)
    }

    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::Customer)` for the zero sentinel.
    #[instrument(skip(self), fields(%store_id, %customer_id))]
    pub async fn customer(
        &self,
        store_id: StoreId,
        customer_id: CustomerId,
    ) -> Result<CustomerRecord, ReadError> {
        let customer = self
            .query(&IStorefront::getCustomerCall {
                storeId: U256::from(store_id.as_u64()),
                customerId: U256::from(customer_id.as_u64()),
            })
            .await?;
        if customer.id.is_zero() {
            return Err(ReadError::NotFound(Entity::Customer));
        }
        customer_record(customer)
    }

    /// # Errors
    ///
    /// Returns `ReadError::Query` if the call fails.
    #[instrument(skip(self), fields(%store_id))]
    pub async fn customers(&self, store_id: StoreId) -> Result<Vec<CustomerRecord>, ReadError> {
        let customers = self
            .query(&IStorefront::getAllCustomersCall {
                storeId: U256::from(store_id.as_u64()),
            })
            .await?;
        live_records(customers, |c| c.id, customer_record)
    }

    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::Order)` for the zero sentinel.
    #[instrument(skip(self), fields(%store_id, %order_id))]
    pub async fn order(&self, store_id: StoreId, order_id: OrderId) -> Result<OrderRecord, ReadError> {
        let order = self
            .query(&IStorefront::getOrderCall {
                storeId: U256::from(store_id.as_u64()),
                orderId: U256::from(order_id.as_u64()),
            })
            .await?;
        if order.id.is_zero() {
            return Err(ReadError::NotFound(Entity::Order));
        }
        order_record(order)
    }

    /// # Errors
    ///
    /// Returns `ReadError::Query` if the call fails.
    #[instrument(skip(self), fields(%store_id))]
    pub async fn orders(&self, store_id: StoreId) -> Result<Vec<OrderRecord>, ReadError> {
        let orders = self
            .query(&IStorefront::getAllOrdersCall {
                storeId: U256::from(store_id.as_u64()),
            })
            .await?;
        live_records(orders, |o| o.id, order_record)
    }

    /// # Errors
    ///
    /// Returns `ReadError::NotFound(Entity::OrderItem)` for the zero sentinel.
    #[instrument(skip(self), fields(%order_item_id))]
    pub async fn order_item(&self, order_item_id: OrderItemId) -> Result<OrderItemRecord, ReadError> {
        let item = self
            .query(&IStorefront::getOrderItemCall {
                orderItemId: U256::from(order_item_id.as_u64()),
            })
            .await?;
        if item.id.is_zero() {
            return Err(ReadError::NotFound(Entity::OrderItem));
        }
        order_item_record(item)
    }

    /// # Errors
    ///
    /// Returns `ReadError::Query` if the call fails.
    #[instrument(skip(self), fields(%order_id))]
    pub async fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItemRecord>, ReadError> {
        let items = self
            .query(&IStorefront::getOrderItemsCall {
                orderId: U256::from(order_id.as_u64()),
            })
            .await?;
        live_records(items, |i| i.id, order_item_record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use alloy::primitives::{TxHash, TxKind};
    use alloy::sol_types::{SolCall, SolValue};
    use async_trait::async_trait;

    use super::*;
    use crate::chain::client::Receipt;
    use crate::chain::signer::SignedTransaction;

    /// Returns the same encoded answer to every call.
    struct FixedAnswer(Result<Bytes, ChainError>);

    #[async_trait]
    impl ChainRpc for FixedAnswer {
        async fn nonce(&self, _: Address) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn gas_price(&self) -> Result<u128, ChainError> {
            unreachable!()
        }
        async fn estimate_gas(&self, _: Address, _: TxKind, _: &Bytes) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn call(&self, _: Address, _: Bytes) -> Result<Bytes, ChainError> {
            self.0.clone()
        }
        async fn send_raw_transaction(&self, _: &SignedTransaction) -> Result<TxHash, ChainError> {
            unreachable!()
        }
        async fn receipt(&self, _: TxHash) -> Result<Option<Receipt>, ChainError> {
            unreachable!()
        }
        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(97)
        }
    }

    fn reader(answer: Result<Bytes, ChainError>) -> ReadPath {
        ReadPath::new(Arc::new(FixedAnswer(answer)), Address::repeat_byte(0xcc))
    }

    /// Encode `value` the way a function returning it would.
    fn encoded<T: SolValue>(value: T) -> Result<Bytes, ChainError> {
        Ok(Bytes::from((value,).abi_encode_params()))
    }

    fn product(id: u64) -> IStorefront::Product {
        IStorefront::Product {
            id: U256::from(id),
            storeId: U256::from(1),
            categoryId: U256::from(2),
            name: "Mug".into(),
            description: "Ceramic".into(),
            price: U256::from(1_500),
            image: "mug.png".into(),
            stock: U256::from(12),
        }
    }

    /// Answers the product count and slot reads from a fixed list.
    struct ProductSlots(Vec<IStorefront::Product>);

    #[async_trait]
    impl ChainRpc for ProductSlots {
        async fn nonce(&self, _: Address) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn gas_price(&self) -> Result<u128, ChainError> {
            unreachable!()
        }
        async fn estimate_gas(&self, _: Address, _: TxKind, _: &Bytes) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn call(&self, _: Address, input: Bytes) -> Result<Bytes, ChainError> {
            if let Ok(call) = IStorefront::getProductCountForStoreCall::abi_decode(&input) {
                assert_eq!(call.storeId, U256::from(1));
                return encoded(U256::from(self.0.len()));
            }
            let call = IStorefront::getProductForStoreCall::abi_decode(&input)
                .map_err(|e| ChainError::Rejected(e.to_string()))?;
            let index = usize::try_from(call.index).unwrap();
            encoded(self.0.get(index).cloned().unwrap_or_default())
        }
        async fn send_raw_transaction(&self, _: &SignedTransaction) -> Result<TxHash, ChainError> {
            unreachable!()
        }
        async fn receipt(&self, _: TxHash) -> Result<Option<Receipt>, ChainError> {
            unreachable!()
        }
        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(97)
        }
    }

    fn slots(products: Vec<IStorefront::Product>) -> ReadPath {
        ReadPath::new(Arc::new(ProductSlots(products)), Address::repeat_byte(0xcc))
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let path = slots(vec![product(3), product(0)]);
        let err = path
            .product(StoreId::new(1), ProductId::new(9))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::NotFound(Entity::Product)));
        assert!(!path.product_exists(StoreId::new(1), ProductId::new(9)).await.unwrap());
        assert!(!path.product_exists(StoreId::new(1), ProductId::new(0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_is_found_by_id_not_slot() {
        let path = slots(vec![product(3), product(0), product(9)]);
        let record = path
            .product(StoreId::new(1), ProductId::new(9))
            .await
            .unwrap();
        assert_eq!(record.id, ProductId::new(9));
        assert_eq!(record.price, TokenAmount::new(1_500));
        assert_eq!(record.stock, 12);
        assert!(path.product_exists(StoreId::new(1), ProductId::new(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_listing_enumerates_live_slots() {
        let path = slots(vec![product(7), product(0), product(2)]);
        let ids: Vec<u64> = path
            .products(StoreId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.as_u64())
            .collect();
        assert_eq!(ids, vec![7, 2]);
    }

    #[tokio::test]
    async fn test_empty_storefront_is_not_found() {
        let answer = (Address::ZERO, String::new()).abi_encode_params();
        let path = reader(Ok(Bytes::from(answer)));
        let err = path.storefront(Address::repeat_byte(1)).await.unwrap_err();
        assert!(matches!(err, ReadError::NotFound(Entity::Store)));
    }

    #[tokio::test]
    async fn test_storefront_metadata_is_parsed() {
        let owner = Address::repeat_byte(1);
        let answer =
            (owner, r#"{"name":"Acme","description":"Shop"}"#.to_string()).abi_encode_params();
        let path = reader(Ok(Bytes::from(answer)));
        let record = path.storefront(owner).await.unwrap();
        assert_eq!(record.metadata["name"], "Acme");
        assert_eq!(record.owner, owner.to_checksum(None));
    }

    #[tokio::test]
    async fn test_zero_category_is_not_found() {
        let category = IStorefront::Category {
            id: U256::ZERO,
            storeId: U256::ZERO,
            name: String::new(),
            description: String::new(),
            parentId: U256::ZERO,
        };
        let path = reader(encoded(category));
        let err = path
            .category(StoreId::new(1), CategoryId::new(3))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Category not found");
    }

    #[tokio::test]
    async fn test_listing_skips_deleted_slots() {
        let order = |id: u64| IStorefront::Order {
            id: U256::from(id),
            storeId: U256::from(1),
            customerId: U256::from(4),
            orderStatus: 1,
            subtotal: U256::from(100),
            tax: U256::from(8),
            shippingCost: U256::from(5),
            total: U256::from(113),
        };
        let path = reader(encoded(vec![order(1), order(0), order(3)]));
        let orders = path.orders(StoreId::new(1)).await.unwrap();
        let ids: Vec<u64> = orders.iter().map(|o| o.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(orders[0].order_status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_query_error() {
        let path = reader(Err(ChainError::Network("down".into())));
        let err = path.has_store(Address::repeat_byte(1)).await.unwrap_err();
        assert!(matches!(err, ReadError::Query(ChainError::Network(_))));
    }

    #[tokio::test]
    async fn test_garbage_is_a_decode_error() {
        let path = reader(Ok(Bytes::from_static(&[1, 2, 3])));
        let err = path.has_store(Address::repeat_byte(1)).await.unwrap_err();
        assert!(matches!(err, ReadError::Query(ChainError::Decode(_))));
    }
}

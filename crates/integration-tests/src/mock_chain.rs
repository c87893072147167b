//! In-memory chain that executes the storefront contract's calls.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::sol_types::{SolInterface, SolValue};
use async_trait::async_trait;
use storechain_gateway::chain::contract::IStorefront::{self, IStorefrontCalls};
use storechain_gateway::chain::{ChainError, ChainRpc, Receipt, SignedTransaction};

const GAS_PRICE: u128 = 1_000_000_000;
const GAS_USED: u64 = 50_000;

/// Contract state. Ids assigned by the contract start at 1; deleted slots are
/// zeroed rather than removed, as a Solidity array or mapping would be.
#[derive(Default)]
struct Storefront {
    stores: HashMap<Address, String>,
    /// Per-store product slots in creation order, enumerated by index.
    products: HashMap<U256, Vec<IStorefront::Product>>,
    categories: HashMap<U256, Vec<IStorefront::Category>>,
    customers: Vec<IStorefront::Customer>,
    orders: Vec<IStorefront::Order>,
    order_items: Vec<IStorefront::OrderItem>,
}

fn next_id(len: usize) -> U256 {
    U256::from(len + 1)
}

/// Slot for a contract-assigned id, if it is live.
fn live<T>(slots: &mut [T], id: U256, slot_id: impl Fn(&T) -> U256) -> Option<&mut T> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    slots.get_mut(index).filter(|slot| !slot_id(slot).is_zero())
}

fn found<T: Clone + Default>(slots: &[T], id: U256, slot_id: impl Fn(&T) -> U256) -> T {
    usize::try_from(id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|index| slots.get(index))
        .filter(|slot| !slot_id(slot).is_zero())
        .cloned()
        .unwrap_or_default()
}

impl Storefront {
    fn product_mut(&mut self, store_id: U256, product_id: U256) -> Option<&mut IStorefront::Product> {
        if product_id.is_zero() {
            return None;
        }
        self.products
            .get_mut(&store_id)?
            .iter_mut()
            .find(|p| p.id == product_id)
    }

    /// Apply a state-changing call; `false` means the call reverted.
    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, sender: Address, call: IStorefrontCalls) -> bool {
        match call {
            IStorefrontCalls::createStorefront(c) => {
                if self.stores.contains_key(&sender) {
                    return false;
                }
                self.stores.insert(sender, c.metadata);
            }
            IStorefrontCalls::updateStorefront(c) => match self.stores.get_mut(&sender) {
                Some(metadata) => *metadata = c.metadata,
                None => return false,
            },
            IStorefrontCalls::deleteStorefront(_) => {
                if self.stores.remove(&sender).is_none() {
                    return false;
                }
            }
            IStorefrontCalls::createProduct(c) => {
                let slots = self.products.entry(c.storeId).or_default();
                if c.productId.is_zero() || slots.iter().any(|p| p.id == c.productId) {
                    return false;
                }
                slots.push(IStorefront::Product {
                    id: c.productId,
                    storeId: c.storeId,
                    categoryId: c.categoryId,
                    name: c.name,
                    description: c.description,
                    price: c.price,
                    image: c.image,
                    stock: c.stock,
                });
            }
            IStorefrontCalls::updateProduct(c) => {
                let Some(product) = self.product_mut(c.storeId, c.productId) else {
                    return false;
                };
                product.categoryId = c.categoryId;
                product.name = c.name;
                product.description = c.description;
                product.price = c.price;
                product.image = c.image;
                product.stock = c.stock;
            }
            IStorefrontCalls::deleteProduct(c) => {
                let Some(product) = self.product_mut(c.storeId, c.productId) else {
                    return false;
                };
                *product = IStorefront::Product::default();
            }
            IStorefrontCalls::addCategory(c) => {
                let slots = self.categories.entry(c.storeId).or_default();
                slots.push(IStorefront::Category {
                    id: next_id(slots.len()),
                    storeId: c.storeId,
                    name: c.name,
                    description: c.description,
                    parentId: c.parentId,
                });
            }
            IStorefrontCalls::updateCategory(c) => {
                let slots = self.categories.entry(c.storeId).or_default();
                let Some(category) = live(slots, c.categoryId, |s| s.id) else {
                    return false;
                };
                category.name = c.name;
                category.description = c.description;
                category.parentId = c.parentId;
            }
            IStorefrontCalls::deleteCategory(c) => {
                let slots = self.categories.entry(c.storeId).or_default();
                let Some(category) = live(slots, c.categoryId, |s| s.id) else {
                    return false;
                };
                *category = IStorefront::Category::default();
            }
            IStorefrontCalls::addCustomer(c) => {
                self.customers.push(IStorefront::Customer {
                    id: next_id(self.customers.len()),
                    storeId: U256::ZERO,
                    email: c.email,
                    name: c.name,
                    shippingAddress: c.shippingAddress,
                    billingAddress: c.billingAddress,
                    phoneNumber: c.phoneNumber,
                });
            }
            IStorefrontCalls::updateCustomer(c) => {
                let Some(customer) = live(&mut self.customers, c.customerId, |s| s.id) else {
                    return false;
                };
                customer.email = c.email;
                customer.name = c.name;
                customer.shippingAddress = c.shippingAddress;
                customer.billingAddress = c.billingAddress;
                customer.phoneNumber = c.phoneNumber;
            }
            IStorefrontCalls::deleteCustomer(c) => {
                let Some(customer) = live(&mut self.customers, c.customerId, |s| s.id) else {
                    return false;
                };
                *customer = IStorefront::Customer::default();
            }
            IStorefrontCalls::createOrder(c) => {
                if c.orderStatus > 4 {
                    return false;
                }
                self.orders.push(IStorefront::Order {
                    id: next_id(self.orders.len()),
                    storeId: U256::ZERO,
                    customerId: c.customerId,
                    orderStatus: c.orderStatus,
                    subtotal: c.subtotal,
                    tax: c.tax,
                    shippingCost: c.shippingCost,
                    total: c.total,
                });
            }
            IStorefrontCalls::updateOrder(c) => {
                let Some(order) = live(&mut self.orders, c.orderId, |s| s.id) else {
                    return false;
                };
                order.orderStatus = c.orderStatus;
                order.subtotal = c.subtotal;
                order.tax = c.tax;
                order.shippingCost = c.shippingCost;
                order.total = c.total;
            }
            IStorefrontCalls::deleteOrder(c) => {
                let Some(order) = live(&mut self.orders, c.orderId, |s| s.id) else {
                    return false;
                };
                *order = IStorefront::Order::default();
            }
            IStorefrontCalls::addOrderItem(c) => {
                if live(&mut self.orders, c.orderId, |s| s.id).is_none() {
                    return false;
                }
                self.order_items.push(IStorefront::OrderItem {
                    id: next_id(self.order_items.len()),
                    orderId: c.orderId,
                    productId: c.productId,
                    quantity: c.quantity,
                    price: c.price,
                });
            }
            IStorefrontCalls::updateOrderItem(c) => {
                let Some(item) = live(&mut self.order_items, c.orderItemId, |s| s.id) else {
                    return false;
                };
                item.quantity = c.quantity;
                item.price = c.price;
            }
            IStorefrontCalls::deleteOrderItem(c) => {
                let Some(item) = live(&mut self.order_items, c.orderItemId, |s| s.id) else {
                    return false;
                };
                *item = IStorefront::OrderItem::default();
            }
            // Views sent as transactions succeed without effect.
            _ => {}
        }
        true
    }

    /// Answer a read-only call with ABI-encoded return data.
    fn view(&self, call: IStorefrontCalls) -> Result<Vec<u8>, ChainError> {
        let encoded = match call {
            IStorefrontCalls::hasStore(c) => (self.stores.contains_key(&c.owner),).abi_encode_params(),
            IStorefrontCalls::getStorefront(c) => match self.stores.get(&c.account) {
                Some(metadata) => (c.account, metadata.clone()).abi_encode_params(),
                None => (Address::ZERO, String::new()).abi_encode_params(),
            },
            IStorefrontCalls::getProductForStore(c) => {
                let product = usize::try_from(c.index)
                    .ok()
                    .and_then(|index| self.products.get(&c.storeId)?.get(index).cloned())
                    .unwrap_or_default();
                (product,).abi_encode_params()
            }
            IStorefrontCalls::getProductCountForStore(c) => {
                let count = self.products.get(&c.storeId).map_or(0, Vec::len);
                (U256::from(count),).abi_encode_params()
            }
            IStorefrontCalls::getCategory(c) => {
                let slots = self.categories.get(&c.storeId).map_or(&[][..], Vec::as_slice);
                (found(slots, c.categoryId, |s| s.id),).abi_encode_params()
            }
            IStorefrontCalls::getAllCategories(c) => {
                let slots = self.categories.get(&c.storeId).cloned().unwrap_or_default();
                (slots,).abi_encode_params()
            }
            IStorefrontCalls::getCustomer(c) => {
                (found(&self.customers, c.customerId, |s| s.id),).abi_encode_params()
            }
            IStorefrontCalls::getAllCustomers(_) => (self.customers.clone(),).abi_encode_params(),
            IStorefrontCalls::getOrder(c) => {
                (found(&self.orders, c.orderId, |s| s.id),).abi_encode_params()
            }
            IStorefrontCalls::getAllOrders(_) => (self.orders.clone(),).abi_encode_params(),
            IStorefrontCalls::getOrderItem(c) => {
                (found(&self.order_items, c.orderItemId, |s| s.id),).abi_encode_params()
            }
            IStorefrontCalls::getOrderItems(c) => {
                let items: Vec<_> = self
                    .order_items
                    .iter()
                    .filter(|item| item.orderId == c.orderId)
                    .cloned()
                    .collect();
                (items,).abi_encode_params()
            }
            _ => return Err(ChainError::Rejected("execution reverted".to_string())),
        };
        Ok(encoded)
    }
}

#[derive(Default)]
struct Ledger {
    nonces: HashMap<Address, u64>,
    receipts: HashMap<TxHash, Receipt>,
    accepted_nonces: Vec<u64>,
    block: u64,
    contract: Storefront,
}

/// A [`ChainRpc`] backed by in-memory state.
pub struct MockChain {
    chain_id: u64,
    ledger: Mutex<Ledger>,
    hold_receipts: AtomicBool,
}

impl MockChain {
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ledger: Mutex::new(Ledger::default()),
            hold_receipts: AtomicBool::new(false),
        }
    }

    /// Accept transactions but never report a receipt for them.
    pub fn hold_receipts(&self) {
        self.hold_receipts.store(true, Ordering::SeqCst);
    }

    /// Nonces of every accepted transaction, in acceptance order.
    pub fn accepted_nonces(&self) -> Vec<u64> {
        self.ledger.lock().unwrap().accepted_nonces.clone()
    }

    /// Number of accepted transactions.
    pub fn transaction_count(&self) -> usize {
        self.ledger.lock().unwrap().accepted_nonces.len()
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn nonce(&self, address: Address) -> Result<u64, ChainError> {
        tokio::task::yield_now().await;
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .nonces
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        Ok(GAS_PRICE)
    }

    async fn estimate_gas(&self, _: Address, _: TxKind, _: &Bytes) -> Result<u64, ChainError> {
        Ok(GAS_USED)
    }

    async fn call(&self, _: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let call = IStorefrontCalls::abi_decode(&input)
            .map_err(|e| ChainError::Rejected(format!("execution reverted: {e}")))?;
        let ledger = self.ledger.lock().unwrap();
        ledger.contract.view(call).map(Bytes::from)
    }

    async fn send_raw_transaction(&self, tx: &SignedTransaction) -> Result<TxHash, ChainError> {
        // Give concurrent submitters a chance to interleave.
        tokio::task::yield_now().await;

        let envelope = TxEnvelope::decode_2718(&mut tx.raw.as_ref())
            .map_err(|e| ChainError::Rejected(format!("invalid transaction: {e}")))?;
        let sender = envelope
            .recover_signer()
            .map_err(|e| ChainError::Rejected(format!("invalid signature: {e}")))?;
        if envelope.chain_id() != Some(self.chain_id) {
            return Err(ChainError::Rejected("invalid chain id".to_string()));
        }

        let hash = *envelope.tx_hash();
        let nonce = envelope.nonce();
        let mut ledger = self.ledger.lock().unwrap();

        let expected = ledger.nonces.get(&sender).copied().unwrap_or_default();
        if nonce < expected {
            return Err(ChainError::Rejected("nonce too low".to_string()));
        }
        if nonce > expected {
            return Err(ChainError::Rejected("nonce too high".to_string()));
        }
        ledger.nonces.insert(sender, expected + 1);
        ledger.accepted_nonces.push(nonce);

        let (success, contract_address) = match envelope.kind() {
            TxKind::Create => (true, Some(sender.create(nonce))),
            TxKind::Call(_) => match IStorefrontCalls::abi_decode(envelope.input()) {
                Ok(call) => (ledger.contract.execute(sender, call), None),
                Err(_) => (false, None),
            },
        };

        ledger.block += 1;
        let receipt = Receipt {
            tx_hash: hash,
            block_number: Some(ledger.block),
            gas_used: GAS_USED,
            contract_address,
            success,
        };
        if !self.hold_receipts.load(Ordering::SeqCst) {
            ledger.receipts.insert(hash, receipt);
        }
        Ok(hash)
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        Ok(self.ledger.lock().unwrap().receipts.get(&tx_hash).cloned())
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        Ok(self.chain_id)
    }
}

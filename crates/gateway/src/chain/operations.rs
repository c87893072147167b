//! Write operation descriptors.
//!
//! Every state-changing call the gateway can make is listed here once, with
//! its Solidity signature, the existence check it needs before a transaction
//! is sent, and the message returned on success. The write pipeline is driven
//! entirely by these descriptors.

use std::fmt;
use std::str::FromStr;

use super::error::EncodingError;

/// Version of the contract call interface the gateway speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceVersion {
    #[default]
    V1,
}

impl InterfaceVersion {
    /// Parse the numeric version used in configuration.
    #[must_use]
    pub const fn from_number(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }
}

/// Existence check run against chain state before a write is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precheck {
    None,
    /// The signing account must not own a store yet.
    StoreAbsent,
    /// The signing account must already own a store.
    StorePresent,
    /// The product id (second key) must be unused in the store (first key).
    ProductAbsent,
}

/// The state-changing operations of the storefront contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    CreateStorefront,
    UpdateStorefront,
    DeleteStorefront,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    AddCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateOrder,
    UpdateOrder,
    DeleteOrder,
    AddOrderItem,
    UpdateOrderItem,
    DeleteOrderItem,
}

/// Static description of one write operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub signature: &'static str,
    pub precheck: Precheck,
    pub success_message: &'static str,
}

const fn op(
    name: &'static str,
    signature: &'static str,
    precheck: Precheck,
    success_message: &'static str,
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        signature,
        precheck,
        success_message,
    }
}

impl WriteOperation {
    pub const ALL: [Self; 18] = [
        Self::CreateStorefront,
        Self::UpdateStorefront,
        Self::DeleteStorefront,
        Self::CreateProduct,
        Self::UpdateProduct,
        Self::DeleteProduct,
        Self::AddCategory,
        Self::UpdateCategory,
        Self::DeleteCategory,
        Self::AddCustomer,
        Self::UpdateCustomer,
        Self::DeleteCustomer,
        Self::CreateOrder,
        Self::UpdateOrder,
        Self::DeleteOrder,
        Self::AddOrderItem,
        Self::UpdateOrderItem,
        Self::DeleteOrderItem,
    ];

    /// Descriptor for this operation in the given interface version.
    #[must_use]
    pub fn descriptor(self, version: InterfaceVersion) -> OperationDescriptor {
        match version {
            InterfaceVersion::V1 => self.descriptor_v1(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn descriptor_v1(self) -> OperationDescriptor {
        use Precheck::{None, ProductAbsent, StoreAbsent, StorePresent};

        match self {
            Self::CreateStorefront => op(
                "createStorefront",
                "createStorefront(string)",
                StoreAbsent,
                "Storefront created successfully",
            ),
            Self::UpdateStorefront => op(
                "updateStorefront",
                "updateStorefront(string)",
                StorePresent,
                "Storefront updated successfully",
            ),
            Self::DeleteStorefront => op(
                "deleteStorefront",
                "deleteStorefront()",
                StorePresent,
                "Storefront deleted successfully",
            ),
            Self::CreateProduct => op(
                "createProduct",
                "createProduct(uint256,uint256,uint256,string,string,uint256,string,uint256)",
                ProductAbsent,
                "Product created and mapped to store successfully",
            ),
            Self::UpdateProduct => op(
                "updateProduct",
                "updateProduct(uint256,uint256,uint256,string,string,uint256,string,uint256)",
                None,
                "Product updated successfully",
            ),
            Self::DeleteProduct => op(
                "deleteProduct",
                "deleteProduct(uint256,uint256)",
                None,
                "Product deleted successfully",
            ),
            Self::AddCategory => op(
                "addCategory",
                "addCategory(uint256,string,string,uint256)",
                None,
                "Category added successfully",
            ),
            Self::UpdateCategory => op(
                "updateCategory",
                "updateCategory(uint256,uint256,string,string,uint256)",
                None,
                "Category updated successfully",
            ),
            Self::DeleteCategory => op(
                "deleteCategory",
                "deleteCategory(uint256,uint256)",
                None,
                "Category deleted successfully",
            ),
            Self::AddCustomer => op(
                "addCustomer",
                "addCustomer(string,string,string,string,string,string)",
                None,
                "Customer added successfully",
            ),
            Self::UpdateCustomer => op(
                "updateCustomer",
                "updateCustomer(uint256,string,string,string,string,string,string)",
                None,
                "Customer updated successfully",
            ),
            Self::DeleteCustomer => op(
                "deleteCustomer",
                "deleteCustomer(uint256)",
                None,
                "Customer deleted successfully",
            ),
            Self::CreateOrder => op(
                "createOrder",
                "createOrder(uint256,uint8,uint256,uint256,uint256,uint256)",
                None,
                "Order created successfully",
            ),
            Self::UpdateOrder => op(
                "updateOrder",
                "updateOrder(uint256,uint8,uint256,uint256,uint256,uint256)",
                None,
                "Order updated successfully",
            ),
            Self::DeleteOrder => op(
                "deleteOrder",
                "deleteOrder(uint256)",
                None,
                "Order deleted successfully",
            ),
            Self::AddOrderItem => op(
                "addOrderItem",
                "addOrderItem(uint256,uint256,uint256,uint256)",
                None,
                "Order item added successfully",
            ),
            Self::UpdateOrderItem => op(
                "updateOrderItem",
                "updateOrderItem(uint256,uint256,uint256)",
                None,
                "Order item updated successfully",
            ),
            Self::DeleteOrderItem => op(
                "deleteOrderItem",
                "deleteOrderItem(uint256)",
                None,
                "Order item deleted successfully",
            ),
        }
    }

    /// Contract function name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor_v1().name
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WriteOperation {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| EncodingError::UnknownOperation(s.to_string()))
    }
}

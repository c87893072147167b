//! Contract call encoding.
//!
//! Turns an operation plus positional arguments into call data (selector and
//! ABI-encoded arguments). Argument count and types are checked against the
//! operation's signature so malformed writes fail before touching the network.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::Function;
use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{Bytes, U256};

use super::error::EncodingError;
use super::operations::{InterfaceVersion, WriteOperation};

/// A `uint256` argument.
#[must_use]
pub fn uint<T>(value: T) -> DynSolValue
where
    U256: UintTryFrom<T>,
{
    DynSolValue::Uint(U256::from(value), 256)
}

/// A `uint8` argument.
#[must_use]
pub fn uint8(value: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 8)
}

/// A `string` argument.
#[must_use]
pub fn text(value: impl Into<String>) -> DynSolValue {
    DynSolValue::String(value.into())
}

/// Encodes write operations for one interface version.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallEncoder {
    version: InterfaceVersion,
}

impl CallEncoder {
    #[must_use]
    pub const fn new(version: InterfaceVersion) -> Self {
        Self { version }
    }

    #[must_use]
    pub const fn version(&self) -> InterfaceVersion {
        self.version
    }

    /// Encode a call to `operation` with `args` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::Arity` or `EncodingError::Type` if the
    /// arguments do not fit the operation's signature.
    pub fn encode(
        &self,
        operation: WriteOperation,
        args: &[DynSolValue],
    ) -> Result<Bytes, EncodingError> {
        let descriptor = operation.descriptor(self.version);
        let function = Function::parse(descriptor.signature)
            .map_err(|e| EncodingError::Abi(e.to_string()))?;

        if function.inputs.len() != args.len() {
            return Err(EncodingError::Arity {
                operation: descriptor.name,
                expected: function.inputs.len(),
                actual: args.len(),
            });
        }

        for (index, (param, value)) in function.inputs.iter().zip(args).enumerate() {
            let expected = param
                .resolve()
                .map_err(|e| EncodingError::Abi(e.to_string()))?;
            if !expected.matches(value) {
                return Err(EncodingError::Type {
                    operation: descriptor.name,
                    index,
                    expected: expected.sol_type_name().into_owned(),
                });
            }
        }

        let data = function
            .abi_encode_input(args)
            .map_err(|e| EncodingError::Abi(e.to_string()))?;
        Ok(Bytes::from(data))
    }

    /// Encode a call by contract function name.
    ///
    /// # Errors
    ///
    /// Returns `EncodingError::UnknownOperation` for names outside the
    /// interface, otherwise as [`CallEncoder::encode`].
    pub fn encode_by_name(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes, EncodingError> {
        let operation: WriteOperation = name.parse()?;
        self.encode(operation, args)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use alloy::sol_types::SolCall;

    use super::*;
    use crate::chain::contract::IStorefront;

    fn encoder() -> CallEncoder {
        CallEncoder::new(InterfaceVersion::V1)
    }

    #[test]
    fn test_encodes_like_the_contract_bindings() {
        let data = encoder()
            .encode(
                WriteOperation::CreateStorefront,
                &[text(r#"{"name":"Acme","description":"Shop"}"#)],
            )
            .unwrap();
        let expected = IStorefront::createStorefrontCall {
            metadata: r#"{"name":"Acme","description":"Shop"}"#.to_string(),
        }
        .abi_encode();
        assert_eq!(data.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_uint_accepts_key_and_amount_widths() {
        assert_eq!(uint(7u64), DynSolValue::Uint(U256::from(7), 256));
        assert_eq!(uint(u128::MAX), DynSolValue::Uint(U256::from(u128::MAX), 256));
        assert_eq!(uint(3u32), uint(3u64));
    }

    #[test]
    fn test_order_status_is_uint8() {
        let data = encoder()
            .encode(
                WriteOperation::CreateOrder,
                &[uint(4u64), uint8(2), uint(100u64), uint(8u64), uint(5u64), uint(113u64)],
            )
            .unwrap();
        let expected = IStorefront::createOrderCall {
            customerId: U256::from(4),
            orderStatus: 2,
            subtotal: U256::from(100),
            tax: U256::from(8),
            shippingCost: U256::from(5),
            total: U256::from(113),
        }
        .abi_encode();
        assert_eq!(data.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_every_operation_matches_its_binding_selector() {
        let selectors = [
            (WriteOperation::CreateStorefront, IStorefront::createStorefrontCall::SELECTOR),
            (WriteOperation::UpdateStorefront, IStorefront::updateStorefrontCall::SELECTOR),
            (WriteOperation::DeleteStorefront, IStorefront::deleteStorefrontCall::SELECTOR),
            (WriteOperation::CreateProduct, IStorefront::createProductCall::SELECTOR),
            (WriteOperation::UpdateProduct, IStorefront::updateProductCall::SELECTOR),
            (WriteOperation::DeleteProduct, IStorefront::deleteProductCall::SELECTOR),
            (WriteOperation::AddCategory, IStorefront::addCategoryCall::SELECTOR),
            (WriteOperation::UpdateCategory, IStorefront::updateCategoryCall::SELECTOR),
            (WriteOperation::DeleteCategory, IStorefront::deleteCategoryCall::SELECTOR),
            (WriteOperation::AddCustomer, IStorefront::addCustomerCall::SELECTOR),
            (WriteOperation::UpdateCustomer, IStorefront::updateCustomerCall::SELECTOR),
            (WriteOperation::DeleteCustomer, IStorefront::deleteCustomerCall::SELECTOR),
            (WriteOperation::CreateOrder, IStorefront::createOrderCall::SELECTOR),
            (WriteOperation::UpdateOrder, IStorefront::updateOrderCall::SELECTOR),
            (WriteOperation::DeleteOrder, IStorefront::deleteOrderCall::SELECTOR),
            (WriteOperation::AddOrderItem, IStorefront::addOrderItemCall::SELECTOR),
            (WriteOperation::UpdateOrderItem, IStorefront::updateOrderItemCall::SELECTOR),
            (WriteOperation::DeleteOrderItem, IStorefront::deleteOrderItemCall::SELECTOR),
        ];
        assert_eq!(selectors.len(), WriteOperation::ALL.len());

        for (operation, selector) in selectors {
            let function = Function::parse(operation.descriptor(InterfaceVersion::V1).signature)
                .unwrap();
            assert_eq!(function.selector().0, selector, "{operation}");
        }
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let err = encoder()
            .encode(WriteOperation::DeleteProduct, &[uint(1u64)])
            .unwrap_err();
        assert_eq!(
            err,
            EncodingError::Arity {
                operation: "deleteProduct",
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = encoder()
            .encode(WriteOperation::DeleteOrder, &[text("7")])
            .unwrap_err();
        assert!(matches!(err, EncodingError::Type { index: 0, .. }));

        // A uint256 where uint8 is declared.
        let err = encoder()
            .encode(
                WriteOperation::UpdateOrder,
                &[uint(1u64), uint(2u64), uint(1u64), uint(1u64), uint(1u64), uint(1u64)],
            )
            .unwrap_err();
        assert!(matches!(err, EncodingError::Type { index: 1, .. }));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = encoder().encode_by_name("mintTokens", &[]).unwrap_err();
        assert_eq!(err, EncodingError::UnknownOperation("mintTokens".to_string()));

        assert!(encoder().encode_by_name("deleteStorefront", &[]).is_ok());
    }
}

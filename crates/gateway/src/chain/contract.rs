//! Solidity bindings for the storefront contract.
//!
//! The contract itself is opaque to the gateway; these declarations are the
//! call interface it exposes (interface version 1).

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    #[sol(all_derives)]
    interface IStorefront {
        struct Product {
            uint256 id;
            uint256 storeId;
            uint256 categoryId;
            string name;
            string description;
            uint256 price;
            string image;
            uint256 stock;
        }

        struct Category {
            uint256 id;
            uint256 storeId;
            string name;
            string description;
            uint256 parentId;
        }

        struct Customer {
            uint256 id;
            uint256 storeId;
            string email;
            string name;
            string shippingAddress;
            string billingAddress;
            string phoneNumber;
        }

        struct Order {
            uint256 id;
            uint256 storeId;
            uint256 customerId;
            uint8 orderStatus;
            uint256 subtotal;
            uint256 tax;
            uint256 shippingCost;
            uint256 total;
        }

        struct OrderItem {
            uint256 id;
            uint256 orderId;
            uint256 productId;
            uint256 quantity;
            uint256 price;
        }

        // Storefronts are keyed by msg.sender.
        function createStorefront(string memory metadata) external;
        function updateStorefront(string memory metadata) external;
        function deleteStorefront() external;
        function hasStore(address owner) external view returns (bool);
        function getStorefront(address account) external view returns (address owner, string memory metadata);

        function createProduct(uint256 storeId, uint256 productId, uint256 categoryId, string memory name, string memory description, uint256 price, string memory image, uint256 stock) external;
        function updateProduct(uint256 storeId, uint256 productId, uint256 categoryId, string memory name, string memory description, uint256 price, string memory image, uint256 stock) external;
        function deleteProduct(uint256 storeId, uint256 productId) external;
        function getProductForStore(uint256 storeId, uint256 index) external view returns (Product memory product);
        function getProductCountForStore(uint256 storeId) external view returns (uint256 count);

        function addCategory(uint256 storeId, string memory name, string memory description, uint256 parentId) external;
        function updateCategory(uint256 storeId, uint256 categoryId, string memory name, string memory description, uint256 parentId) external;
        function deleteCategory(uint256 storeId, uint256 categoryId) external;
        function getCategory(uint256 storeId, uint256 categoryId) external view returns (Category memory category);
        function getAllCategories(uint256 storeId) external view returns (Category[] memory categories);

        function addCustomer(string memory email, string memory name, string memory password, string memory shippingAddress, string memory billingAddress, string memory phoneNumber) external;
        function updateCustomer(uint256 customerId, string memory email, string memory name, string memory password, string memory shippingAddress, string memory billingAddress, string memory phoneNumber) external;
        function deleteCustomer(uint256 customerId) external;
        function getCustomer(uint256 storeId, uint256 customerId) external view returns (Customer memory customer);
        function getAllCustomers(uint256 storeId) external view returns (Customer[] memory customers);

        function createOrder(uint256 customerId, uint8 orderStatus, uint256 subtotal, uint256 tax, uint256 shippingCost, uint256 total) external;
        function updateOrder(uint256 orderId, uint8 orderStatus, uint256 subtotal, uint256 tax, uint256 shippingCost, uint256 total) external;
        function deleteOrder(uint256 orderId) external;
        function getOrder(uint256 storeId, uint256 orderId) external view returns (Order memory order);
        function getAllOrders(uint256 storeId) external view returns (Order[] memory orders);

        function addOrderItem(uint256 orderId, uint256 productId, uint256 quantity, uint256 price) external;
        function updateOrderItem(uint256 orderItemId, uint256 quantity, uint256 price) external;
        function deleteOrderItem(uint256 orderItemId) external;
        function getOrderItem(uint256 orderItemId) external view returns (OrderItem memory item);
        function getOrderItems(uint256 orderId) external view returns (OrderItem[] memory items);
    }
}

//! Table schema definitions for the retail datasets

use super::types::*;

// =============================================================================
// Catalog
// =============================================================================

pub static DEPARTMENTS: TableSchema = TableSchema {
    name: "departments",
    source_file: "departments.csv",
    columns: &[
        Column::key("department_id", ColumnType::Integer),
        Column::new("department_name", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static CATEGORIES: TableSchema = TableSchema {
    name: "categories",
    source_file: "categories.csv",
    columns: &[
        Column::key("category_id", ColumnType::Integer),
        Column::new("category_department_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new(
        "category_department_id",
        "departments",
        "department_id",
    )],
};

// =============================================================================
// Customers
// =============================================================================

pub static CUSTOMERS: TableSchema = TableSchema {
    name: "customers",
    source_file: "customers.csv",
    columns: &[
        Column::key("customer_id", ColumnType::Integer),
        Column::new("customer_fname", ColumnType::Text),
        Column::new("customer_lname", ColumnType::Text),
        Column::new("customer_email", ColumnType::Text),
    ],
    foreign_keys: &[],
};

// =============================================================================
// Products and Orders
// =============================================================================

pub static PRODUCTS: TableSchema = TableSchema {
    name: "products",
    source_file: "products.csv",
    columns: &[
        Column::key("product_id", ColumnType::Integer),
        Column::new("product_category_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new(
        "product_category_id",
        "categories",
        "category_id",
    )],
};

pub static ORDERS: TableSchema = TableSchema {
    name: "orders",
    source_file: "orders.csv",
    columns: &[
        Column::key("order_id", ColumnType::Integer),
        Column::new("order_date", ColumnType::Timestamp),
        Column::new("order_customer_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new(
        "order_customer_id",
        "customers",
        "customer_id",
    )],
};

// =============================================================================
// Order Lines
// =============================================================================

pub static ORDER_ITEMS: TableSchema = TableSchema {
    name: "order_items",
    source_file: "order_items.csv",
    columns: &[
        Column::new("order_item_order_id", ColumnType::Integer),
        Column::new("order_item_product_id", ColumnType::Integer),
        Column::new("order_item_quantity", ColumnType::Integer),
        Column::new("order_item_product_price", ColumnType::Real),
        Column::new("order_item_subtotal", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("order_item_order_id", "orders", "order_id"),
        ForeignKey::new("order_item_product_id", "products", "product_id"),
    ],
};

// =============================================================================
// Schema Registry
// =============================================================================

/// All table schemas in load order
pub static ALL_TABLES: &[&TableSchema] = &[
    &DEPARTMENTS,
    &CATEGORIES,
    &CUSTOMERS,
    &PRODUCTS,
    &ORDERS,
    &ORDER_ITEMS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

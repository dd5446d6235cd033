//! Retail record kinds stored in logical tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Record;

/// A customer account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Customer {
    pub partition_key: String,
    pub row_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub email: String,
    pub shipping_address: String,
}

impl Record for Customer {
    const TYPE_NAME: &'static str = "Customer";
    const FIELDS: &'static [&'static str] = &[
        "PartitionKey",
        "RowKey",
        "Timestamp",
        "ETag",
        "Name",
        "Surname",
        "Username",
        "Email",
        "ShippingAddress",
    ];

    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}

/// A catalogue product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Product {
    pub partition_key: String,
    pub row_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub product_name: String,
    pub description: String,
    pub price: f64,
    pub stock_available: i32,
    pub image_url: String,
}

impl Record for Product {
    const TYPE_NAME: &'static str = "Product";
    const FIELDS: &'static [&'static str] = &[
        "PartitionKey",
        "RowKey",
        "Timestamp",
        "ETag",
        "ProductName",
        "Description",
        "Price",
        "StockAvailable",
        "ImageUrl",
    ];

    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}

/// A customer order for a single product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Order {
    pub partition_key: String,
    pub row_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub customer_id: String,
    pub username: String,
    pub product_id: String,
    pub product_name: String,
    pub order_date: DateTime<Utc>,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub status: String,
}

impl Record for Order {
    const TYPE_NAME: &'static str = "Order";
    const FIELDS: &'static [&'static str] = &[
        "PartitionKey",
        "RowKey",
        "Timestamp",
        "ETag",
        "CustomerId",
        "Username",
        "ProductId",
        "ProductName",
        "OrderDate",
        "Quantity",
        "UnitPrice",
        "TotalPrice",
        "Status",
    ];

    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}

//! JSON wire codec for records with case-insensitive field matching

use serde_json::{Map, Value};

use crate::domain::DomainError;

use super::entity::Record;

/// Serializes a record into its canonical JSON form
pub fn encode_record<T: Record>(record: &T) -> Result<Value, DomainError> {
    serde_json::to_value(record).map_err(|e| {
        DomainError::internal(format!("Failed to serialize {}: {}", T::TYPE_NAME, e))
    })
}

/// Decodes a record, matching field names case-insensitively against `T::FIELDS`
pub fn decode_record<T: Record>(value: Value) -> Result<T, DomainError> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(DomainError::validation(format!(
                "Expected a JSON object for {}, got {}",
                T::TYPE_NAME,
                json_kind(&other)
            )))
        }
    };

    let normalized = Value::Object(normalize_fields(T::FIELDS, object));

    serde_json::from_value(normalized).map_err(|e| {
        DomainError::validation(format!("Invalid {} body: {}", T::TYPE_NAME, e))
    })
}

/// Decodes a JSON array of records
pub fn decode_records<T: Record>(value: Value) -> Result<Vec<T>, DomainError> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_record::<T>).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(DomainError::validation(format!(
            "Expected a JSON array of {}, got {}",
            T::TYPE_NAME,
            json_kind(&other)
        ))),
    }
}

/// Decodes a record from a raw request body
pub fn decode_record_bytes<T: Record>(body: &[u8]) -> Result<T, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::validation("Request body is required"));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DomainError::validation(format!("Malformed JSON body: {}", e)))?;

    if value.is_null() {
        return Err(DomainError::validation("Request body is required"));
    }

    decode_record(value)
}

/// Renames object keys to their canonical spelling.
///
/// An exact match always wins over a case-insensitive one; keys that match no
/// known field are kept untouched.
fn normalize_fields(fields: &[&str], object: Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::with_capacity(object.len());
    let mut loose = Vec::new();

    for (key, value) in object {
        if fields.contains(&key.as_str()) {
            normalized.insert(key, value);
        } else {
            loose.push((key, value));
        }
    }

    for (key, value) in loose {
        let canonical = fields
            .iter()
            .find(|field| field.eq_ignore_ascii_case(&key))
            .map(|field| field.to_string());

        match canonical {
            Some(field) if !normalized.contains_key(&field) => {
                normalized.insert(field, value);
            }
            Some(_) => {}
            None => {
                normalized.entry(key).or_insert(value);
            }
        }
    }

    normalized
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{Customer, Order, Product};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn alice() -> Customer {
        Customer {
            partition_key: "Customer".to_string(),
            row_key: "1".to_string(),
            name: "Alice".to_string(),
            surname: "Smith".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            shipping_address: "1 Main St".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        let value = json!({
            "partitionkey": "Customer",
            "rowKey": "1",
            "NAME": "Alice",
            "surname": "Smith",
            "username": "alice",
            "email": "alice@example.com",
            "shippingAddress": "1 Main St"
        });

        let customer: Customer = decode_record(value).unwrap();
        assert_eq!(customer, alice());
    }

    #[test]
    fn test_exact_match_wins_over_case_variant() {
        let value = json!({
            "PartitionKey": "C",
            "RowKey": "1",
            "name": "lower",
            "Name": "Exact"
        });

        let customer: Customer = decode_record(value).unwrap();
        assert_eq!(customer.name, "Exact");
    }

    #[test]
    fn test_records_survive_encode_decode() {
        let customer = alice();
        let decoded: Customer = decode_record(encode_record(&customer).unwrap()).unwrap();
        assert_eq!(decoded, customer);

        let product = Product {
            partition_key: "Product".to_string(),
            row_key: "p-1".to_string(),
            product_name: "Lamp".to_string(),
            price: 19.99,
            stock_available: 4,
            ..Default::default()
        };
        let decoded: Product = decode_record(encode_record(&product).unwrap()).unwrap();
        assert_eq!(decoded, product);

        let order = Order {
            partition_key: "Order".to_string(),
            row_key: "o-1".to_string(),
            order_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            quantity: 2,
            unit_price: 19.99,
            total_price: 39.98,
            status: "Submitted".to_string(),
            ..Default::default()
        };
        let decoded: Order = decode_record(encode_record(&order).unwrap()).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_record::<Customer>(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_decode_bytes_rejects_empty_and_malformed() {
        assert!(matches!(
            decode_record_bytes::<Customer>(b"").unwrap_err(),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            decode_record_bytes::<Customer>(b"null").unwrap_err(),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            decode_record_bytes::<Customer>(b"{not json").unwrap_err(),
            DomainError::Validation { .. }
        ));
    }

    #[test]
    fn test_decode_records_array() {
        let value = json!([
            {"partitionKey": "C", "rowKey": "1", "name": "A"},
            {"PartitionKey": "C", "RowKey": "2", "Name": "B"}
        ]);

        let customers: Vec<Customer> = decode_records(value).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[1].name, "B");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let value = json!({"PartitionKey": "C", "RowKey": "1", "Nickname": "Al"});
        let customer: Customer = decode_record(value).unwrap();
        assert_eq!(customer.row_key, "1");
    }
}

//! Resource identity: record type names to logical table names, and resource classes

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Maps a record type name to its pluralized logical table name.
///
/// Known record kinds have fixed names; any other type falls back to `<TypeName>s`.
pub fn resource_name(type_name: &str) -> Cow<'static, str> {
    match type_name {
        "Customer" => Cow::Borrowed("Customers"),
        "Product" => Cow::Borrowed("Products"),
        "Order" => Cow::Borrowed("Orders"),
        other => Cow::Owned(format!("{}s", other)),
    }
}

/// Storage primitive a request path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    Table,
    Blob,
    Queue,
    FileShare,
}

impl ResourceClass {
    pub const ALL: [ResourceClass; 4] = [Self::Table, Self::Blob, Self::Queue, Self::FileShare];

    /// Path segment used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Blob => "blob",
            Self::Queue => "queue",
            Self::FileShare => "fileshare",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Self::Table),
            "blob" => Ok(Self::Blob),
            "queue" => Ok(Self::Queue),
            "fileshare" => Ok(Self::FileShare),
            other => Err(DomainError::not_found(format!(
                "No handler for resource class '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_resource_names() {
        assert_eq!(resource_name("Customer"), "Customers");
        assert_eq!(resource_name("Product"), "Products");
        assert_eq!(resource_name("Order"), "Orders");
    }

    #[test]
    fn test_unknown_type_falls_back_to_plural() {
        assert_eq!(resource_name("Invoice"), "Invoices");
        assert_eq!(resource_name("Address"), "Addresss");
    }

    #[test]
    fn test_resource_class_round_trip() {
        for class in ResourceClass::ALL {
            assert_eq!(class.as_str().parse::<ResourceClass>().unwrap(), class);
        }
    }

    #[test]
    fn test_unknown_resource_class() {
        let err = "bucket".parse::<ResourceClass>().unwrap_err();
        assert!(err.is_not_found());
    }
}

//! Record traits and key types

use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

use super::resource::resource_name;

/// Composite primary key of a table record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub partition_key: String,
    pub row_key: String,
}

impl RecordKey {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Both halves of the key must be non-empty
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.partition_key.trim().is_empty() {
            return Err(DomainError::validation("PartitionKey must not be empty"));
        }

        if self.row_key.trim().is_empty() {
            return Err(DomainError::validation("RowKey must not be empty"));
        }

        Ok(())
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}

/// A typed record stored in a logical table.
///
/// Each record kind declares its type name and the canonical wire names of its
/// fields at compile time; the logical table it lives in is derived from the
/// type name with [`resource_name`].
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Declared type name, e.g. `Customer`
    const TYPE_NAME: &'static str;

    /// Canonical wire names of every field, used for case-insensitive decoding
    const FIELDS: &'static [&'static str];

    fn partition_key(&self) -> &str;

    fn row_key(&self) -> &str;

    fn key(&self) -> RecordKey {
        RecordKey::new(self.partition_key(), self.row_key())
    }

    /// Logical table name for this record kind
    fn resource_name() -> Cow<'static, str> {
        resource_name(Self::TYPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_display() {
        let key = RecordKey::new("C", "1");
        assert_eq!(key.to_string(), "C/1");
    }

    #[test]
    fn test_record_key_validate() {
        assert!(RecordKey::new("C", "1").validate().is_ok());
        assert!(RecordKey::new("", "1").validate().is_err());
        assert!(RecordKey::new("C", "  ").validate().is_err());
    }

    #[test]
    fn test_record_key_ordering() {
        let mut keys = vec![
            RecordKey::new("B", "1"),
            RecordKey::new("A", "2"),
            RecordKey::new("A", "1"),
        ];
        keys.sort();

        assert_eq!(keys[0], RecordKey::new("A", "1"));
        assert_eq!(keys[2], RecordKey::new("B", "1"));
    }
}

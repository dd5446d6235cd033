//! Hierarchical file share primitive

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Address of a file inside a share
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    pub share: String,
    pub directory: Option<String>,
    pub file_name: String,
}

impl FilePath {
    pub fn new(
        share: impl Into<String>,
        directory: Option<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            share: share.into(),
            directory: directory.filter(|d| !d.trim().is_empty()),
            file_name: file_name.into(),
        }
    }

    /// Path relative to the share root
    pub fn relative(&self) -> String {
        match &self.directory {
            Some(directory) => format!("{}/{}", directory.trim_matches('/'), self.file_name),
            None => self.file_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.share.trim().is_empty() {
            return Err(DomainError::validation("Share name must not be empty"));
        }

        if self.file_name.trim().is_empty() || self.file_name.contains('/') {
            return Err(DomainError::validation(format!(
                "Invalid file name '{}'",
                self.file_name
            )));
        }

        Ok(())
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.share, self.relative())
    }
}

/// File share primitive required by the file share handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileShareStore: Send + Sync {
    async fn create_share_if_not_exists(&self, share: &str) -> Result<bool, DomainError>;

    /// Writes the file, creating intermediate directories
    async fn put_file(&self, path: &FilePath, content: Bytes) -> Result<(), DomainError>;

    async fn get_file(&self, path: &FilePath) -> Result<Option<Bytes>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let root = FilePath::new("contracts", None, "a.pdf");
        assert_eq!(root.relative(), "a.pdf");

        let nested = FilePath::new("contracts", Some("2024/".to_string()), "a.pdf");
        assert_eq!(nested.relative(), "2024/a.pdf");
        assert_eq!(nested.to_string(), "contracts/2024/a.pdf");
    }

    #[test]
    fn test_blank_directory_is_root() {
        let path = FilePath::new("contracts", Some("  ".to_string()), "a.pdf");
        assert!(path.directory.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(FilePath::new("s", None, "f.txt").validate().is_ok());
        assert!(FilePath::new("", None, "f.txt").validate().is_err());
        assert!(FilePath::new("s", None, "a/b").validate().is_err());
    }
}

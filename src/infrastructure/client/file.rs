use bytes::Bytes;

/// An uploaded file as handed to the client
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl FileContent {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declared content type, or one guessed from the file name
    pub fn mime_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .to_string()
        })
    }
}

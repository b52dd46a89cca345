use serde::Serialize;

/// One file of a repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Repository-relative path (forward slashes). Unique within a snapshot.
    pub path: String,
    /// Text content, absent when filtered out or when fetching failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Size in bytes as reported by the snapshot listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileRecord {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            size: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Last path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }
}

/// Last `/`-separated segment of a path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

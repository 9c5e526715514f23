//! Inbound message filtering.

/// Substring filter for inbound messages.
///
/// An empty keyword accepts every message.
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keyword: String,
}

impl KeywordFilter {
    /// Create a filter for the given keyword.
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }

    /// Whether this filter accepts every message.
    #[must_use]
    pub fn accepts_all(&self) -> bool {
        self.keyword.is_empty()
    }

    /// Whether the given text passes the filter.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.keyword.is_empty() || text.contains(&self.keyword)
    }
}

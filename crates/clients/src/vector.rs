use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_MATCH_COUNT;

/// Narrows the candidate set of a search. `book_name` of `None` searches every book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default = "default_match_count")]
    pub match_count: NonZeroUsize,
}

fn default_match_count() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MATCH_COUNT).unwrap_or(NonZeroUsize::MIN)
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            book_name: None,
            match_count: default_match_count(),
        }
    }
}

impl SearchFilter {
    pub fn all_books(match_count: NonZeroUsize) -> Self {
        Self { book_name: None, match_count }
    }

    /// A blank book name means "no filter".
    pub fn within_book(mut self, book_name: &str) -> Self {
        let book_name = book_name.trim();
        self.book_name = if book_name.is_empty() { None } else { Some(book_name.to_string()) };
        self
    }

    pub fn book_name(&self) -> Option<&str> {
        self.book_name.as_deref().filter(|name| !name.trim().is_empty())
    }
}

/// One ranked match, in the order the backing service returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub book_name: String,
    #[serde(default)]
    pub page_number: Option<i64>,
    pub chunk_text: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_chunks: u64,
    pub total_books: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_book_name_means_no_filter() {
        let filter = SearchFilter::default().within_book("   ");
        assert_eq!(filter.book_name(), None);

        let filter = SearchFilter::default().within_book("Deep_Learning");
        assert_eq!(filter.book_name(), Some("Deep_Learning"));

        let filter = SearchFilter { book_name: Some(String::new()), ..Default::default() };
        assert_eq!(filter.book_name(), None);
    }

    #[test]
    fn test_filter_deserialization_defaults() {
        let filter: SearchFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.match_count.get(), DEFAULT_MATCH_COUNT);
        assert_eq!(filter.book_name, None);

        assert!(serde_json::from_str::<SearchFilter>(r#"{"match_count": 0}"#).is_err());
    }

    #[test]
    fn test_search_result_tolerates_missing_page_and_extra_columns() {
        let raw = r#"{"id": 12, "book_name": "Hands_On_ML", "chunk_text": "gradient descent", "similarity": 0.82}"#;
        let result: SearchResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.page_number, None);
        assert_eq!(result.book_name, "Hands_On_ML");
    }
}

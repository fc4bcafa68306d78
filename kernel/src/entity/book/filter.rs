use crate::entity::{AuthorId, CategoryId, EditorialId, Money, SelectLimit, SelectOffset};

/// Criteria for catalog listings. Inactive books never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub author_id: Option<AuthorId>,
    pub editorial_id: Option<EditorialId>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    /// Restrict to featured books, ordered by average rating.
    pub featured: bool,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

impl BookFilter {
    /// Search term wrapped for a substring `LIKE` match, with `%`, `_` and `\` escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| {
                let escaped = term
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{escaped}%")
            })
    }
}

#[cfg(test)]
mod test {
    use super::BookFilter;

    #[test]
    fn search_pattern_escapes_wildcards() {
        let filter = BookFilter {
            search: Some(" 100%_real ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%100\\%\\_real%"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = BookFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_pattern(), None);
    }
}

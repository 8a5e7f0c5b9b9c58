/// Placeholder value of the category dropdown. Selecting it means
/// "no category" when browsing and is rejected when posting an item.
pub const CATEGORY_SENTINEL: &str = "category";

/// Which unsold products a catalog listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    /// Every unsold product.
    All,
    /// Unsold products in exactly this category.
    Category(String),
    /// Unsold products whose name or description contains the term.
    Search(String),
}

impl CatalogFilter {
    /// Pick the listing mode from the `filter` and `search` query parameters.
    /// A category filter wins over a search term; empty values count as absent.
    pub fn from_query(filter: Option<&str>, search: Option<&str>) -> Self {
        let filter = filter.filter(|f| !f.is_empty());
        let search = search.filter(|s| !s.is_empty());

        match (filter, search) {
            (Some(CATEGORY_SENTINEL), _) => Self::All,
            (Some(category), _) => Self::Category(category.to_string()),
            (None, Some(term)) => Self::Search(term.to_string()),
            (None, None) => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        assert_eq!(
            CatalogFilter::from_query(Some("books"), None),
            CatalogFilter::Category("books".into())
        );
    }

    #[test]
    fn test_sentinel_resets_filter() {
        assert_eq!(CatalogFilter::from_query(Some("category"), None), CatalogFilter::All);
        // the sentinel also suppresses a search term sent alongside it
        assert_eq!(
            CatalogFilter::from_query(Some("category"), Some("lamp")),
            CatalogFilter::All
        );
    }

    #[test]
    fn test_filter_takes_precedence_over_search() {
        assert_eq!(
            CatalogFilter::from_query(Some("toys"), Some("lamp")),
            CatalogFilter::Category("toys".into())
        );
    }

    #[test]
    fn test_search_and_default() {
        assert_eq!(
            CatalogFilter::from_query(None, Some("lamp")),
            CatalogFilter::Search("lamp".into())
        );
        assert_eq!(CatalogFilter::from_query(None, None), CatalogFilter::All);
        assert_eq!(CatalogFilter::from_query(Some(""), Some("")), CatalogFilter::All);
    }
}

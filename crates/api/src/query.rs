//! Shared query parameter types for API handlers.

use bakery_core::catalog::{parse_tags_input, ProductFilter};
use serde::Deserialize;

/// Parse the storefront listing query into a [`ProductFilter`].
///
/// Accepts `category`, `q`, `featured`, repeated `tag` keys, and a
/// comma-separated `tags` key. Taken as raw pairs because `tag` may repeat.
pub fn product_filter(pairs: &[(String, String)]) -> ProductFilter {
    let mut filter = ProductFilter::default();
    for (key, value) in pairs {
        match key.as_str() {
            "category" => filter.category = Some(value.clone()),
            "q" | "search" => filter.search = Some(value.clone()),
            "tag" => filter.tags.push(value.clone()),
            "tags" => filter.tags.extend(parse_tags_input(value)),
            "featured" => filter.featured = matches!(value.as_str(), "true" | "1"),
            _ => {}
        }
    }
    filter.normalized()
}

/// `?path=` for the page gate.
#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_tags_accumulate() {
        let filter = product_filter(&pairs(&[("tag", "Birthday"), ("tag", "eggless")]));
        assert_eq!(filter.tags, vec!["Birthday", "eggless"]);
    }

    #[test]
    fn test_blank_values_are_no_filter() {
        let filter = product_filter(&pairs(&[("category", ""), ("q", "  "), ("tags", " , ")]));
        assert!(filter.category.is_none());
        assert!(filter.search.is_none());
        assert!(filter.tags.is_empty());
        assert!(!filter.featured);
    }

    #[test]
    fn test_featured_and_search() {
        let filter = product_filter(&pairs(&[("featured", "true"), ("q", " choco ")]));
        assert!(filter.featured);
        assert_eq!(filter.search.as_deref(), Some("choco"));
    }
}

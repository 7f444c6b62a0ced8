//! Catalog filtering, tag expansion, and product form validation.
//!
//! Stored tags have inconsistent casing, so requested tags are expanded into
//! casing variants before the repository runs an overlap (`&&`) query.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoreError;

/// Pseudo-tag that stands for every occasion tag.
pub const OCCASIONS_TAG: &str = "occasions";

/// Tags that `occasions` expands to.
pub const OCCASION_TAGS: &[&str] = &["Birthday", "Anniversary", "Wedding", "Baby Shower"];

/// Storefront listing filter. All fields are optional and combine with AND;
/// tags combine with OR.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    pub tags: Vec<String>,
    /// Restrict to featured products.
    pub featured: bool,
}

impl ProductFilter {
    /// Drop blank values so `?category=&q=` behaves like no filter.
    pub fn normalized(mut self) -> Self {
        self.category = self.category.filter(|c| !c.trim().is_empty());
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.tags.retain(|t| !t.trim().is_empty());
        self
    }

    /// Tag values to send to the overlap query, or `None` when not filtering by tag.
    pub fn expanded_tags(&self) -> Option<Vec<String>> {
        if self.tags.is_empty() {
            None
        } else {
            Some(expand_tags(&self.tags))
        }
    }

    /// `ILIKE` pattern for the search term with `%`, `_` and `\` escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Expand requested tags for an overlap query.
///
/// `occasions` (any casing) is replaced by [`OCCASION_TAGS`]. Each remaining
/// tag contributes its original, lowercase, and capitalized forms. Duplicates
/// are dropped, keeping first-occurrence order.
pub fn expand_tags(requested: &[String]) -> Vec<String> {
    let wants_occasions = requested
        .iter()
        .any(|t| t.eq_ignore_ascii_case(OCCASIONS_TAG));

    let mut search: Vec<String> = requested
        .iter()
        .filter(|t| !t.eq_ignore_ascii_case(OCCASIONS_TAG))
        .cloned()
        .collect();
    if wants_occasions {
        search.extend(OCCASION_TAGS.iter().map(|t| t.to_string()));
    }

    let mut expanded: Vec<String> = Vec::with_capacity(search.len() * 3);
    for tag in &search {
        for variant in [tag.clone(), tag.to_lowercase(), capitalize(tag)] {
            if !expanded.contains(&variant) {
                expanded.push(variant);
            }
        }
    }
    expanded
}

/// Split the admin form's comma-separated tag input.
pub fn parse_tags_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a product slug: lowercase name, spaces to hyphens, plus a numeric suffix.
pub fn slugify(name: &str, suffix: u32) -> String {
    format!("{}-{suffix}", name.trim().to_lowercase().replace(' ', "-"))
}

/// One size row submitted with the product form.
#[derive(Debug, Clone, Deserialize)]
pub struct SizeInput {
    pub size_label: String,
    pub price: Decimal,
}

/// Validate the admin product form. A product without sizes cannot be bought,
/// so at least one size is mandatory.
pub fn validate_product(name: &str, category: &str, sizes: &[SizeInput]) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if category.trim().is_empty() {
        return Err(CoreError::Validation("Category is required".into()));
    }
    if sizes.is_empty() {
        return Err(CoreError::Validation("At least one size is required".into()));
    }
    for (i, size) in sizes.iter().enumerate() {
        if size.size_label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Size #{} must have a label",
                i + 1
            )));
        }
        if size.price.is_sign_negative() {
            return Err(CoreError::Validation(format!(
                "Size '{}' has a negative price",
                size.size_label
            )));
        }
    }
    Ok(())
}

//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Well-known storefront dependencies with semantic meaning.
///
/// Each tag carries a default timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Stock/availability checks.
    Inventory,
    /// Single-product catalog lookups.
    Catalog,
    /// Full product listing.
    Listing,
    /// Custom dependency with name.
    Custom(&'static str),
}

impl DependencyTag {
    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Inventory => Duration::from_secs(2),
            Self::Catalog => Duration::from_secs(3),
            Self::Listing => Duration::from_secs(5),
            Self::Custom(_) => Duration::from_secs(3),
        }
    }

    /// Get the default number of retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Custom(_) => 0,
            _ => 1,
        }
    }

    /// Get the name of this dependency for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Catalog => "catalog",
            Self::Listing => "listing",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_is_tighter_than_listing() {
        assert!(DependencyTag::Inventory.default_timeout() < DependencyTag::Listing.default_timeout());
    }

    #[test]
    fn test_custom_tags_do_not_retry() {
        assert_eq!(DependencyTag::Custom("reviews").default_max_retries(), 0);
        assert_eq!(DependencyTag::Inventory.default_max_retries(), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(DependencyTag::Catalog.to_string(), "catalog");
        assert_eq!(DependencyTag::Custom("reviews").name(), "reviews");
    }
}

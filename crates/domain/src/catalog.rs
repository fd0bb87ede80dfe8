//! Catalog read model and picture URI composition.

use common::CatalogItemId;
use serde::{Deserialize, Serialize};

/// A catalog item as stored in the Catalog Store.
///
/// The picture URI is stored relative; [`UriComposer`] turns it into a
/// fully-qualified URI when an order snapshot is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog item identifier.
    pub id: CatalogItemId,
    /// Product name.
    pub name: String,
    /// Relative picture URI (e.g., `/pics/7.png`).
    pub picture_uri: String,
}

impl CatalogItem {
    /// Creates a new catalog item.
    pub fn new(id: CatalogItemId, name: impl Into<String>, picture_uri: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            picture_uri: picture_uri.into(),
        }
    }
}

/// Composes fully-qualified picture URIs from stored relative ones.
#[derive(Debug, Clone)]
pub struct UriComposer {
    base_url: String,
}

impl UriComposer {
    /// Creates a composer rooted at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Joins the base URL with a stored relative picture URI.
    pub fn compose_pic_uri(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_pic_uri_joins_base_and_relative() {
        let composer = UriComposer::new("https://cdn.example.com");
        assert_eq!(
            composer.compose_pic_uri("/pics/7.png"),
            "https://cdn.example.com/pics/7.png"
        );
    }

    #[test]
    fn compose_pic_uri_tolerates_slashes() {
        let composer = UriComposer::new("https://cdn.example.com/");
        assert_eq!(
            composer.compose_pic_uri("pics/7.png"),
            "https://cdn.example.com/pics/7.png"
        );
    }
}

//! Catalog product and stock quote types.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product as described by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price, in the storefront's currency unit.
    pub price: f64,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

/// Available stock for a product, as answered by the stock service.
///
/// Quotes are consulted once per mutation and never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockQuote {
    /// Product the quote is for.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units available for purchase.
    #[serde(rename = "amount")]
    pub available: i64,
}

impl StockQuote {
    pub fn new(product_id: ProductId, available: i64) -> Self {
        Self {
            product_id,
            available,
        }
    }

    /// Check if `amount` units can be held in a cart.
    pub fn can_fulfill(&self, amount: i64) -> bool {
        self.available >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_format() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://cdn/shoe.jpg"}"#,
        )
        .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title, "Tênis de Caminhada");
        assert_eq!(product.price, 179.9);
    }

    #[test]
    fn test_stock_wire_format() {
        let quote: StockQuote = serde_json::from_str(r#"{"id":3,"amount":2}"#).unwrap();

        assert_eq!(quote, StockQuote::new(ProductId::new(3), 2));
        assert!(quote.can_fulfill(2));
        assert!(!quote.can_fulfill(3));
    }
}

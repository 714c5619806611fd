//! Cart line type.

use crate::catalog::Product;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One product entry in the cart with a quantity.
///
/// Title, price and image are a snapshot of the catalog taken when the line
/// was created and are not refreshed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product this line holds. Unique within a cart.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    pub image: String,
    /// Quantity, always at least 1.
    pub amount: i64,
}

impl CartLine {
    /// Start a line holding a single unit of `product`.
    pub fn from_product(product: Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Price of the whole line (unit price times amount).
    pub fn subtotal(&self) -> f64 {
        self.price * self.amount as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_one() {
        let line = CartLine::from_product(Product::new(
            ProductId::new(2),
            "Tênis VR Caminhada",
            139.9,
            "https://cdn/2.jpg",
        ));

        assert_eq!(line.product_id, ProductId::new(2));
        assert_eq!(line.amount, 1);
        assert_eq!(line.title, "Tênis VR Caminhada");
    }

    #[test]
    fn test_subtotal() {
        let mut line = CartLine::from_product(Product::new(ProductId::new(1), "Shoe", 10.5, ""));
        line.amount = 4;
        assert_eq!(line.subtotal(), 42.0);
    }

    #[test]
    fn test_wire_format_uses_id() {
        let line = CartLine::from_product(Product::new(ProductId::new(9), "Shoe", 1.0, "img"));
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(
            json,
            r#"{"id":9,"title":"Shoe","price":1.0,"image":"img","amount":1}"#
        );
    }
}

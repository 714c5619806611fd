//! The cart value: an ordered list of lines with unique products.

use std::collections::{BTreeMap, HashSet};

use crate::cart::CartLine;
use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A shopping cart.
///
/// Lines keep insertion order and removing one never reorders the rest.
/// Every line has a distinct product and an amount of at least 1; a cart
/// that breaks either rule cannot be constructed or deserialized.
///
/// A `Cart` is a value: the store replaces it wholesale on every commit, and
/// the transitions below return a new cart instead of editing in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from lines, checking its invariants.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut seen = HashSet::new();
        for line in &lines {
            if line.amount < 1 {
                return Err(CartError::MalformedPersistedState(format!(
                    "line for product {} has amount {}",
                    line.product_id, line.amount
                )));
            }
            if !seen.insert(line.product_id) {
                return Err(CartError::MalformedPersistedState(format!(
                    "product {} appears more than once",
                    line.product_id
                )));
            }
        }
        Ok(Self { lines })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.lines.iter()
    }

    /// Get the line for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Amount held for a product, 0 when it is not in the cart.
    pub fn amount_of(&self, product_id: ProductId) -> i64 {
        self.get(product_id).map(|l| l.amount).unwrap_or(0)
    }

    /// Get number of unique products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.amount).sum()
    }

    /// Sum of every line's subtotal.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Amount held per product, for badges on a product listing.
    pub fn amounts_by_product(&self) -> BTreeMap<ProductId, i64> {
        self.lines
            .iter()
            .map(|l| (l.product_id, l.amount))
            .collect()
    }

    /// A copy of this cart with `line` appended.
    ///
    /// Callers must have checked that the product is not already present.
    pub(crate) fn with_line(&self, line: CartLine) -> Cart {
        debug_assert!(!self.contains(line.product_id));
        debug_assert!(line.amount >= 1);
        let mut lines = self.lines.clone();
        lines.push(line);
        Cart { lines }
    }

    /// A copy of this cart with the product's amount set, or `None` if the
    /// product is not in the cart.
    pub(crate) fn with_amount(&self, product_id: ProductId, amount: i64) -> Option<Cart> {
        debug_assert!(amount >= 1);
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        let mut lines = self.lines.clone();
        lines[index].amount = amount;
        Some(Cart { lines })
    }

    /// A copy of this cart without the product's line, or `None` if the
    /// product is not in the cart.
    pub(crate) fn without(&self, product_id: ProductId) -> Option<Cart> {
        if !self.contains(product_id) {
            return None;
        }
        let lines = self
            .lines
            .iter()
            .filter(|l| l.product_id != product_id)
            .cloned()
            .collect();
        Some(Cart { lines })
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Cart::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn line(id: u64, price: f64, amount: i64) -> CartLine {
        let mut line = CartLine::from_product(Product::new(
            ProductId::new(id),
            format!("Product {}", id),
            price,
            format!("https://cdn/{}.jpg", id),
        ));
        line.amount = amount;
        line
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_with_line_appends() {
        let cart = Cart::new().with_line(line(1, 10.0, 1)).with_line(line(2, 5.0, 1));

        let ids: Vec<u64> = cart.iter().map(|l| l.product_id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_with_amount_changes_only_target() {
        let cart = Cart::from_lines(vec![line(1, 10.0, 1), line(2, 5.0, 2)]).unwrap();

        let updated = cart.with_amount(ProductId::new(2), 4).unwrap();
        assert_eq!(updated.amount_of(ProductId::new(2)), 4);
        assert_eq!(updated.get(ProductId::new(1)), cart.get(ProductId::new(1)));
        // The source value is untouched.
        assert_eq!(cart.amount_of(ProductId::new(2)), 2);

        assert!(cart.with_amount(ProductId::new(3), 1).is_none());
    }

    #[test]
    fn test_without_keeps_survivor_order() {
        let cart = Cart::from_lines(vec![line(1, 1.0, 1), line(2, 1.0, 1), line(3, 1.0, 1)]).unwrap();

        let trimmed = cart.without(ProductId::new(2)).unwrap();
        let ids: Vec<u64> = trimmed.iter().map(|l| l.product_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(trimmed.without(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from_lines(vec![line(1, 10.0, 2), line(2, 2.5, 4)]).unwrap();

        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total(), 30.0);
        assert_eq!(cart.amount_of(ProductId::new(7)), 0);

        let amounts = cart.amounts_by_product();
        assert_eq!(amounts.get(&ProductId::new(1)), Some(&2));
        assert_eq!(amounts.get(&ProductId::new(2)), Some(&4));
    }

    #[test]
    fn test_duplicate_products_rejected() {
        let result = Cart::from_lines(vec![line(1, 1.0, 1), line(1, 1.0, 2)]);
        assert!(matches!(result, Err(CartError::MalformedPersistedState(_))));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = Cart::from_lines(vec![line(1, 1.0, 0)]);
        assert!(matches!(result, Err(CartError::MalformedPersistedState(_))));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let cart = Cart::from_lines(vec![line(1, 179.9, 2)]).unwrap();
        let json = serde_json::to_string(&cart).unwrap();

        assert!(json.starts_with('['));
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let json = r#"[{"id":1,"title":"a","price":1.0,"image":"","amount":1},
                       {"id":1,"title":"a","price":1.0,"image":"","amount":1}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}

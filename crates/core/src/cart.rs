//! Shopping cart model and its pure state transitions.
//!
//! [`Cart::apply`] is the only way a cart changes: it takes the current cart
//! and an action and returns the next cart. It performs no I/O; persisting
//! the result is the caller's job.
//!
//! # Invariants
//!
//! - At most one [`CartLine`] per product id.
//! - Every line has `quantity >= 1`; a line whose quantity drops to zero is
//!   removed rather than kept.
//! - Lines keep first-added order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// The product data a cart line is created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// One product entry in the cart.
///
/// `price`, `title` and `image` are captured when the product is first added
/// and are never refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// A requested change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product, appending a new line if it is not present.
    Add(ProductRef),
    /// Set the quantity of a line; zero or below removes it.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Remove a line.
    Remove(ProductId),
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines, enforcing the cart invariants.
    ///
    /// Lines with a zero quantity are dropped, as are repeated ids after
    /// their first occurrence.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 || cart.get(line.id).is_some() {
                continue;
            }
            cart.lines.push(line);
        }
        cart
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Σ price × quantity, computed fresh on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Apply an action and return the resulting cart.
    #[must_use]
    pub fn apply(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(product) => {
                if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    self.lines.push(CartLine {
                        id: product.id,
                        title: product.title,
                        price: product.price,
                        image: product.image,
                        quantity: 1,
                    });
                }
            }
            CartAction::UpdateQuantity { id, quantity } if quantity <= 0 => {
                self.lines.retain(|line| line.id != id);
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
                    line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Remove(id) => {
                self.lines.retain(|line| line.id != id);
            }
        }
        self
    }

    /// Serialize the cart as a JSON array of lines.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Parse a JSON array of lines, enforcing the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an array of valid cart lines.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let lines: Vec<CartLine> = serde_json::from_str(json)?;
        Ok(Self::from_lines(lines))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: i32, cents: i64) -> ProductRef {
        ProductRef {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents).unwrap(),
            image: format!("https://cdn.example.com/{id}.png"),
        }
    }

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.lines().iter().map(|line| line.id.as_i32()).collect()
    }

    #[test]
    fn test_add_distinct_ids_counts_calls() {
        let calls = [3, 1, 3, 2, 3, 1];
        let cart = calls
            .iter()
            .fold(Cart::new(), |cart, &id| cart.apply(CartAction::Add(product(id, 100))));

        assert_eq!(cart.len(), 3);
        assert_eq!(ids(&cart), vec![3, 1, 2]);
        assert_eq!(cart.get(ProductId::new(3)).unwrap().quantity, 3);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_existing_keeps_first_seen_values() {
        let cart = Cart::new().apply(CartAction::Add(product(1, 1000)));
        let changed = ProductRef {
            title: "Renamed".to_string(),
            price: Price::from_cents(1).unwrap(),
            image: "http://elsewhere/img.png".to_string(),
            ..product(1, 1000)
        };
        let cart = cart.apply(CartAction::Add(changed));

        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.title, "Product 1");
        assert_eq!(line.price, Price::from_cents(1000).unwrap());
        assert_eq!(line.image, "https://cdn.example.com/1.png");
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let cart = Cart::new()
            .apply(CartAction::Add(product(1, 100)))
            .apply(CartAction::Add(product(2, 100)))
            .apply(CartAction::UpdateQuantity {
                id: ProductId::new(1),
                quantity: 0,
            });
        assert_eq!(ids(&cart), vec![2]);
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let cart = Cart::new()
            .apply(CartAction::Add(product(1, 100)))
            .apply(CartAction::UpdateQuantity {
                id: ProductId::new(1),
                quantity: -4,
            });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_preserves_position() {
        let cart = Cart::new()
            .apply(CartAction::Add(product(1, 100)))
            .apply(CartAction::Add(product(2, 100)))
            .apply(CartAction::Add(product(3, 100)))
            .apply(CartAction::UpdateQuantity {
                id: ProductId::new(2),
                quantity: 7,
            });
        assert_eq!(ids(&cart), vec![1, 2, 3]);
        assert_eq!(cart.lines()[1].quantity, 7);
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let cart = Cart::new().apply(CartAction::Add(product(1, 100)));
        let same = cart.clone().apply(CartAction::UpdateQuantity {
            id: ProductId::new(9),
            quantity: 5,
        });
        assert_eq!(same, cart);
    }

    #[test]
    fn test_update_quantity_saturates() {
        let cart = Cart::new()
            .apply(CartAction::Add(product(1, 100)))
            .apply(CartAction::UpdateQuantity {
                id: ProductId::new(1),
                quantity: i64::MAX,
            });
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cart = Cart::new().apply(CartAction::Add(product(1, 100)));
        assert_eq!(cart.clone().apply(CartAction::Remove(ProductId::new(2))), cart);
        assert!(cart.apply(CartAction::Remove(ProductId::new(1))).is_empty());
    }

    #[test]
    fn test_total_recomputed_after_each_mutation() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart = cart.apply(CartAction::Add(product(1, 1050)));
        assert_eq!(cart.total(), Decimal::new(1050, 2));

        cart = cart.apply(CartAction::Add(product(2, 225)));
        cart = cart.apply(CartAction::Add(product(1, 1050)));
        assert_eq!(cart.total(), Decimal::new(2325, 2));

        cart = cart.apply(CartAction::UpdateQuantity {
            id: ProductId::new(2),
            quantity: 4,
        });
        assert_eq!(cart.total(), Decimal::new(3000, 2));

        cart = cart.apply(CartAction::Remove(ProductId::new(1)));
        assert_eq!(cart.total(), Decimal::new(900, 2));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_from_json_normalizes() {
        let json = r#"[
            {"id":1,"title":"A","price":1.5,"image":"https://x/a.png","quantity":2},
            {"id":2,"title":"B","price":2.5,"image":"https://x/b.png","quantity":0},
            {"id":1,"title":"A again","price":9.5,"image":"https://x/a.png","quantity":5}
        ]"#;
        let cart = Cart::from_json(json).unwrap();
        assert_eq!(ids(&cart), vec![1]);
        assert_eq!(cart.lines()[0].title, "A");
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Cart::from_json("{not json").is_err());
        assert!(Cart::from_json("{\"id\":1}").is_err());
    }

    #[test]
    fn test_json_snapshot_format() {
        let cart = Cart::new().apply(CartAction::Add(product(4, 1595)));
        assert_eq!(
            cart.to_json().unwrap(),
            r#"[{"id":4,"title":"Product 4","price":15.95,"image":"https://cdn.example.com/4.png","quantity":1}]"#
        );
        assert_eq!(Cart::from_json(&cart.to_json().unwrap()).unwrap(), cart);
    }
}

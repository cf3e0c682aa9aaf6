use super::ProductId;
use serde::Serialize;

/// One product's quantity in the in-memory cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Transient cart keyed by product. Lines keep the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the line for `product_id`, inserting it with quantity 1 if absent.
    pub fn add(&mut self, product_id: ProductId) -> &CartLine {
        let index = match self.lines.iter().position(|line| line.product_id == product_id) {
            Some(index) => {
                self.lines[index].quantity += 1;
                index
            }
            None => {
                self.lines.push(CartLine { product_id, quantity: 1 });
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut cart = Cart::new();
        cart.add(ProductId(1));
        cart.add(ProductId(2));
        let line = cart.add(ProductId(1)).clone();

        assert_eq!(line, CartLine { product_id: ProductId(1), quantity: 2 });
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.quantity_of(ProductId(3)), 0);
    }
}

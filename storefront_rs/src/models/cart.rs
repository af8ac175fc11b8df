use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::format_price;

/// One line of the cart. Serialized with the same camelCase names the
/// storefront pages keep under the `cart` storage key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Line item identity: the same product in another size or color is a
/// different line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartItemKey {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl CartItemKey {
    pub fn new<P: Into<String>>(product_id: P, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
        }
    }
}

impl std::fmt::Display for CartItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.product_id,
            self.size.as_deref().unwrap_or("null"),
            self.color.as_deref().unwrap_or("null")
        )
    }
}

impl CartItem {
    pub fn key(&self) -> CartItemKey {
        CartItemKey {
            product_id: self.product_id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    pub fn matches(&self, product_id: &str, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == product_id && self.size.as_deref() == size && self.color.as_deref() == color
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    pub fn format_price(&self) -> String {
        format_price(self.price)
    }

    /// "Size: M, Color: red"; either half is dropped when unset.
    pub fn variant_label(&self) -> Option<String> {
        let size = self.size.as_deref().filter(|s| !s.is_empty());
        let color = self.color.as_deref().filter(|c| !c.is_empty());
        match (size, color) {
            (Some(s), Some(c)) => Some(format!("Size: {}, Color: {}", s, c)),
            (Some(s), None) => Some(format!("Size: {}", s)),
            (None, Some(c)) => Some(format!("Color: {}", c)),
            (None, None) => None,
        }
    }
}

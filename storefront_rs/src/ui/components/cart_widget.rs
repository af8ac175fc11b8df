use std::convert::TryFrom;

use log::{debug, error, warn};
use rust_decimal::Decimal;

use crate::models::{CartItem, CartItemKey};
use crate::storage::{LocalStorage, CART_KEY};
use crate::ui::CartMessage;
use crate::utils::format_price;

/// What the widget asks its host to do after handling a message.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    Closed,
    Navigate(&'static str),
}

/// Cart state: an ordered list of line items mirrored to local storage after
/// every change.
pub struct CartWidget<S: LocalStorage> {
    storage: S,
    cart_items: Vec<CartItem>,
}

impl<S: LocalStorage> CartWidget<S> {
    pub const CHECKOUT_URL: &'static str = "/checkout";
    pub const EMPTY_TEXT: &'static str = "Your cart is empty";

    /// Takes the already rehydrated items and writes them back once, as the
    /// widget does when it is mounted.
    pub fn new(storage: S, cart_data: Vec<CartItem>) -> Self {
        let mut widget = Self {
            storage,
            cart_items: cart_data,
        };
        widget.persist();
        widget
    }

    /// Rehydrates from the `cart` key; anything unreadable is an empty cart.
    pub fn load(storage: S) -> Self {
        let cart_data = match storage.get_item(CART_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<CartItem>>(raw.as_str()).unwrap_or_else(|e| {
                warn!("Ignore unreadable cart data: {}", e);
                vec![]
            }),
            Ok(None) => vec![],
            Err(e) => {
                warn!("Failed to read cart from storage: {}", e);
                vec![]
            }
        };
        Self::new(storage, cart_data)
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart_items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.cart_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds a line, or merges the quantity into the line with the same key.
    pub fn add_item(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        let size = item.size.clone();
        let color = item.color.clone();
        match self
            .cart_items
            .iter_mut()
            .find(|i| i.matches(item.product_id.as_str(), size.as_deref(), color.as_deref()))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.cart_items.push(item),
        }
        self.persist();
    }

    pub fn update_quantity(
        &mut self,
        product_id: &str,
        size: Option<&str>,
        color: Option<&str>,
        delta: i64,
    ) {
        let mut matched = false;
        let mut kept = Vec::with_capacity(self.cart_items.len());
        for mut item in self.cart_items.drain(..) {
            if !item.matches(product_id, size, color) {
                kept.push(item);
                continue;
            }
            matched = true;
            let new_quantity = i64::from(item.quantity).saturating_add(delta);
            if new_quantity > 0 {
                item.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
                kept.push(item);
            } else {
                debug!("quantity of {} dropped to {}, removed", item.key(), new_quantity);
            }
        }
        self.cart_items = kept;
        if matched {
            self.persist();
        }
    }

    pub fn remove_item(&mut self, product_id: &str, size: Option<&str>, color: Option<&str>) {
        let before = self.cart_items.len();
        self.cart_items
            .retain(|item| !item.matches(product_id, size, color));
        if self.cart_items.len() != before {
            self.persist();
        }
    }

    /// Empties the cart; the stored copy becomes `[]`.
    pub fn clear(&mut self) {
        self.cart_items.clear();
        self.persist();
    }

    pub fn total_price(&self) -> Decimal {
        self.cart_items.iter().map(CartItem::line_total).sum()
    }

    pub fn formatted_total(&self) -> String {
        format_price(self.total_price())
    }

    /// The "-" button is disabled at quantity 1.
    pub fn can_decrement(&self, key: &CartItemKey) -> bool {
        self.find(key).map(|item| item.quantity > 1).unwrap_or(false)
    }

    pub fn find(&self, key: &CartItemKey) -> Option<&CartItem> {
        self.cart_items
            .iter()
            .find(|item| item.matches(key.product_id.as_str(), key.size.as_deref(), key.color.as_deref()))
    }

    pub fn update(&mut self, message: CartMessage) -> Option<CartEvent> {
        match message {
            CartMessage::IncrementQuantity(key) => {
                self.update_quantity(key.product_id.as_str(), key.size.as_deref(), key.color.as_deref(), 1);
            }
            CartMessage::DecrementQuantity(key) => {
                self.update_quantity(key.product_id.as_str(), key.size.as_deref(), key.color.as_deref(), -1);
            }
            CartMessage::RemoveItem(key) => {
                self.remove_item(key.product_id.as_str(), key.size.as_deref(), key.color.as_deref());
            }
            CartMessage::Checkout => return Some(CartEvent::Navigate(Self::CHECKOUT_URL)),
            CartMessage::Close => return Some(CartEvent::Closed),
        }
        None
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.cart_items) {
            Ok(data) => {
                if let Err(e) = self.storage.set_item(CART_KEY, data.as_str()) {
                    error!("Failed to save cart: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize cart: {}", e),
        }
    }
}

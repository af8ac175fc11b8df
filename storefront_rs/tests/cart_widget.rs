use rust_decimal::Decimal;
use serde_json::{json, Value};

use storefront_rs::models::{CartItem, CartItemKey};
use storefront_rs::storage::{FileStorage, LocalStorage, MemoryStorage, CART_KEY};
use storefront_rs::ui::{CartEvent, CartMessage, CartWidget};

fn item(product_id: &str, size: Option<&str>, color: Option<&str>, quantity: u32, price: i64) -> CartItem {
    CartItem {
        product_id: product_id.to_string(),
        name: format!("product {}", product_id),
        price: Decimal::new(price, 0),
        image_url: format!("https://cdn.example.com/{}.png", product_id),
        quantity,
        size: size.map(str::to_owned),
        color: color.map(str::to_owned),
    }
}

fn stored(storage: &MemoryStorage) -> Value {
    let raw = storage.get_item(CART_KEY).unwrap().expect("cart key written");
    serde_json::from_str(raw.as_str()).unwrap()
}

#[test]
fn test_decrement_to_zero_removes_line() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(storage.clone(), vec![item("p1", Some("M"), Some("red"), 2, 10)]);

    cart.update_quantity("p1", Some("M"), Some("red"), -1);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].quantity, 1);
    assert_eq!(cart.total_price(), Decimal::new(10, 0));

    cart.update_quantity("p1", Some("M"), Some("red"), -1);
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Decimal::ZERO);
    assert_eq!(stored(&storage), json!([]));
}

#[test]
fn test_update_only_touches_matching_variant() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(
        storage.clone(),
        vec![
            item("p1", Some("M"), Some("red"), 1, 10),
            item("p1", Some("L"), Some("red"), 3, 10),
            item("p1", None, None, 4, 10),
            item("p2", Some("M"), Some("red"), 5, 7),
        ],
    );

    cart.update_quantity("p1", Some("M"), Some("red"), -5);

    let keys: Vec<String> = cart.items().iter().map(|i| i.key().to_string()).collect();
    assert_eq!(keys, vec!["p1-L-red", "p1-null-null", "p2-M-red"]);
    assert_eq!(cart.items()[0].quantity, 3);
    assert_eq!(cart.items()[1].quantity, 4);
    assert_eq!(cart.items()[2].quantity, 5);
}

#[test]
fn test_none_matches_only_none() {
    let mut cart = CartWidget::new(MemoryStorage::new(), vec![item("p1", None, Some("red"), 2, 3)]);

    cart.update_quantity("p1", Some(""), Some("red"), 1);
    assert_eq!(cart.items()[0].quantity, 2);

    cart.update_quantity("p1", None, Some("red"), 1);
    assert_eq!(cart.items()[0].quantity, 3);
}

#[test]
fn test_missing_line_is_noop() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(storage.clone(), vec![item("p1", Some("S"), None, 1, 5)]);
    let before = stored(&storage);

    cart.update_quantity("p9", Some("S"), None, 3);
    cart.remove_item("p1", Some("XL"), None);

    assert_eq!(cart.len(), 1);
    assert_eq!(stored(&storage), before);
}

#[test]
fn test_extreme_deltas_saturate() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(storage.clone(), vec![item("p1", None, None, 2, 1)]);

    cart.update_quantity("p1", None, None, i64::MAX);
    assert_eq!(cart.items()[0].quantity, u32::MAX);
    assert_eq!(stored(&storage)[0]["quantity"], json!(u32::MAX));

    cart.update_quantity("p1", None, None, i64::MIN);
    assert!(cart.is_empty());
    assert_eq!(stored(&storage), json!([]));
}

#[test]
fn test_remove_item() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(
        storage.clone(),
        vec![item("p1", Some("M"), None, 1, 5), item("p1", Some("L"), None, 1, 5)],
    );

    cart.remove_item("p1", Some("M"), None);

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.items()[0].size.as_deref(), Some("L"));
    assert_eq!(stored(&storage).as_array().map(|a| a.len()), Some(1));
}

#[test]
fn test_total_price() {
    let empty = CartWidget::new(MemoryStorage::new(), vec![]);
    assert_eq!(empty.total_price(), Decimal::ZERO);
    assert_eq!(empty.formatted_total(), "0.00 ₽");

    let mut a = item("p1", None, None, 3, 0);
    a.price = Decimal::new(1999, 2);
    let b = item("p2", Some("M"), None, 2, 10);
    let c = item("p3", None, Some("blue"), 1, 250);

    let forward = CartWidget::new(MemoryStorage::new(), vec![a.clone(), b.clone(), c.clone()]);
    let backward = CartWidget::new(MemoryStorage::new(), vec![c, b, a]);

    assert_eq!(forward.total_price(), Decimal::new(32997, 2));
    assert_eq!(forward.total_price(), backward.total_price());
    assert_eq!(forward.formatted_total(), "329.97 ₽");
}

#[test]
fn test_add_then_remove_restores_count() {
    let mut cart = CartWidget::new(MemoryStorage::new(), vec![item("p1", Some("M"), None, 1, 5)]);
    let before = cart.len();

    cart.add_item(item("p2", Some("S"), Some("black"), 1, 8));
    assert_eq!(cart.len(), before + 1);

    cart.remove_item("p2", Some("S"), Some("black"));
    assert_eq!(cart.len(), before);
}

#[test]
fn test_add_merges_same_line() {
    let mut cart = CartWidget::new(MemoryStorage::new(), vec![item("p1", Some("M"), None, 1, 5)]);

    cart.add_item(item("p1", Some("M"), None, 2, 5));
    cart.add_item(item("p1", Some("L"), None, 1, 5));

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0].quantity, 3);
}

#[test]
fn test_every_mutation_is_persisted() {
    let storage = MemoryStorage::new();
    let mut cart = CartWidget::new(storage.clone(), vec![item("p1", Some("M"), Some("red"), 2, 10)]);

    assert_eq!(
        stored(&storage),
        json!([{
            "productId": "p1",
            "name": "product p1",
            "price": 10.0,
            "imageUrl": "https://cdn.example.com/p1.png",
            "quantity": 2,
            "size": "M",
            "color": "red"
        }])
    );

    cart.update_quantity("p1", Some("M"), Some("red"), 1);
    assert_eq!(stored(&storage)[0]["quantity"], json!(3));

    cart.add_item(item("p2", None, None, 1, 4));
    assert_eq!(stored(&storage)[1]["size"], Value::Null);
}

#[test]
fn test_load_rehydrates_and_tolerates_garbage() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(
            CART_KEY,
            r#"[{"productId":"p1","name":"Shirt","price":12.5,"imageUrl":"","quantity":2,"size":null,"color":"white"}]"#,
        )
        .unwrap();
    let cart = CartWidget::load(storage.clone());
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_price(), Decimal::new(25, 0));
    assert_eq!(cart.items()[0].variant_label().as_deref(), Some("Color: white"));

    storage.set_item(CART_KEY, "not json").unwrap();
    let cart = CartWidget::load(storage.clone());
    assert!(cart.is_empty());
    assert_eq!(stored(&storage), json!([]));
}

#[test]
fn test_messages() {
    let key = CartItemKey::new("p1", Some("M"), Some("red"));
    let mut cart = CartWidget::new(MemoryStorage::new(), vec![item("p1", Some("M"), Some("red"), 1, 10)]);

    assert!(!cart.can_decrement(&key));
    assert_eq!(cart.update(CartMessage::IncrementQuantity(key.clone())), None);
    assert!(cart.can_decrement(&key));
    assert_eq!(cart.find(&key).map(|i| i.quantity), Some(2));

    assert_eq!(
        cart.update(CartMessage::Checkout),
        Some(CartEvent::Navigate("/checkout"))
    );
    assert_eq!(cart.update(CartMessage::Close), Some(CartEvent::Closed));

    cart.update(CartMessage::RemoveItem(key.clone()));
    assert!(cart.is_empty());
    assert!(!cart.can_decrement(&key));
}

#[test]
fn test_variant_label() {
    assert_eq!(
        item("p1", Some("M"), Some("red"), 1, 1).variant_label().as_deref(),
        Some("Size: M, Color: red")
    );
    assert_eq!(item("p1", Some("M"), None, 1, 1).variant_label().as_deref(), Some("Size: M"));
    assert_eq!(item("p1", None, None, 1, 1).variant_label(), None);
}

#[test]
fn test_file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path()).unwrap();
    {
        let mut cart = CartWidget::new(storage.clone(), vec![]);
        cart.add_item(item("p1", Some("M"), None, 2, 15));
    }
    assert!(dir.path().join("cart.json").exists());

    let mut cart = CartWidget::load(storage.clone());
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_price(), Decimal::new(30, 0));

    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
}

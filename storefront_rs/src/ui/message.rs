use crate::models::{CartItemKey, ImageFile};

/// Actions of the cart widget.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMessage {
    // 数量 +1
    IncrementQuantity(CartItemKey),
    // 数量 -1, 减到 0 就从购物车里去掉
    DecrementQuantity(CartItemKey),
    RemoveItem(CartItemKey),
    // 点击去结算
    Checkout,
    Close,
}

/// Actions of the admin product page.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminMessage {
    NameInput(String),
    DescriptionInput(String),
    PriceInput(String),
    ImageSelected(ImageFile),
    CategoryInput(String),
    SizeInput(String),
    ColorInput(String),
    StockInput(String),
    Submit,
    // confirmed 为 false 表示用户在确认框里取消了
    Delete {
        id: String,
        image_url: String,
        confirmed: bool,
    },
    Refresh,
}

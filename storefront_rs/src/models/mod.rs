mod cart;
mod product;
mod session;
pub use cart::{CartItem, CartItemKey};
pub use product::{ImageFile, NewProduct, Product, ProductForm};
pub use session::{Session, SessionStatus, SessionUser};

pub use crate::types::*;

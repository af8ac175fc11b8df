mod admin_products;
mod cart_widget;

pub use admin_products::ProductsAdminPage;
pub use cart_widget::{CartEvent, CartWidget};

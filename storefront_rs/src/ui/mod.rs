mod app;
mod components;
mod message;

pub use app::{Metadata, Providers, RootLayout, Slot, METADATA};
pub use components::{CartEvent, CartWidget, ProductsAdminPage};
pub use message::*;

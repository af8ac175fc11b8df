pub mod product;
pub mod session;

pub use product::{ProductApi, ProductService};
pub use session::{ApiSessionResolver, JwtSessionResolver, SessionClaims, SessionResolver};

mod product;

pub use product::{Product, ProductInput, ProductQuery, ProductResponse};

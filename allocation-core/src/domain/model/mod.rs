pub mod batch;
pub mod product;

pub use batch::{Batch, OrderLine};
pub use product::Product;

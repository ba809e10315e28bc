pub mod carousel_item;

pub use carousel_item::*;

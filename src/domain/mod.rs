//! Catalog domain types. Plain data with no actor or storage concerns.

pub mod cart;
pub mod criteria;
pub mod product;

pub use cart::*;
pub use criteria::*;
pub use product::*;

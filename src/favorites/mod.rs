//! Durable favorites: a key-value slot abstraction and the favorites set stored in it.

mod kv;
mod store;

pub use kv::*;
pub use store::*;

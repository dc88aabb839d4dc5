//! Storage of downloaded files

pub mod store;

pub use store::*;

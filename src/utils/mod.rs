//! Utility functions for vidserve

pub mod filename;
pub mod url;

pub use filename::*;
pub use url::*;

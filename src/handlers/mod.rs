//! HTTP handlers for page routes.

pub mod pages;
pub use pages::*;

//! Typed access to the nexon server's JSON endpoints.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{Environment, GraphRequest, Package, PreviewPackage};

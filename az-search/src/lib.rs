mod client;
mod error;
pub mod models;
mod service_url;

pub use client::*;
pub use error::*;
pub use models::*;
pub use service_url::*;

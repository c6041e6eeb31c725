// HTTP module - Webflow Data API access
pub mod api;
pub mod client;

pub use api::CollectionApi;
pub use client::WebflowClient;

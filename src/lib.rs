//! wfdocs Library
//!
//! Client, path addressing and persistence for documentation items stored
//! in a Webflow CMS collection, plus the command-line front end built on them.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::path::{FieldPath, PathError};
pub use domain::config::WfDocsConfig;
pub use domain::error::{WfDocsError, WfDocsResult};
pub use domain::item::{Item, ItemList, UpdateItemRequest};
pub use infrastructure::config::Credentials;
pub use infrastructure::http::{CollectionApi, WebflowClient};

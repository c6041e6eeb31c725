// Core module - Document addressing and editing
pub mod path;

pub use path::{FieldPath, PathError};

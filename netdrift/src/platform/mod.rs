//! Platform definitions: per-dialect prompt patterns, session setup
//! commands and failure strings.

mod definition;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use registry::PlatformRegistry;

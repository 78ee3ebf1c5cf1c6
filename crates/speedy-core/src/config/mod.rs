mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Config, IndexConfig, OverlayConfig, expand_home};
pub use validation::warn_unknown_fields;

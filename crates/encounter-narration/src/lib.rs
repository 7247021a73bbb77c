mod error;
mod manager;
mod template;

pub use error::NarrationError;
pub use manager::NarrationManager;
pub use template::{BUILTIN_TEMPLATES, NarrationTemplate};

pub mod commands;
pub mod handlers;

pub use commands::*;
pub use handlers::{build_analyzer, load_registry, registry_store, run};

pub mod app_config;
pub mod loader;
pub mod registry;
pub mod store;

pub use app_config::{AppConfig, PartialAppConfig, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use loader::{read_structured, ConfigLoader, FileFormat};
pub use registry::{absolute_path, ProjectIssue, ProjectRegistry, ValidationReport};
pub use store::{RegistryStore, SetupOutcome, SetupSource, DEFAULT_SETUP_FILE, REGISTRY_FILE_NAME};

pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod logging;
pub mod mcp;
pub mod report;
pub mod types;

// Re-export commonly used items for convenience
pub use analysis::{AnalysisOptions, ProjectAnalyzer};
pub use config::{AppConfig, ProjectRegistry};
pub use errors::AppError;
pub use git::{GitCli, VcsClient};

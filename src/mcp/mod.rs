//! MCP 工具服务
//!
//! 六个团队分析工具：`setup_team_projects`、`analyze_team_projects`、
//! `validate_team_config`、`add_team_project`、`list_team_projects`、
//! `quick_team_analysis`。项目列表保存在 [`RegistryStore`](crate::config::RegistryStore) 中。

pub mod params;
pub mod server;
pub mod tools;

pub use params::{AddProjectParams, AnalyzeParams, QuickAnalysisParams, SetupParams, ValidateParams};
pub use server::{serve_stdio, TeamReviewServer};
pub use tools::{TeamTools, DEFAULT_QUICK_MESSAGE};

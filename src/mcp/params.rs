//! MCP 工具参数

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupParams {
    /// Configuration mode: env (from environment) or file (from config file). Defaults to env.
    pub mode: Option<String>,
    /// Path to the configuration file when using file mode
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    /// Output directory for analysis reports
    pub output_path: Option<String>,
    /// Include security and performance risk analysis (default true)
    pub include_risk_analysis: Option<bool>,
    /// Include code optimization suggestions (default true)
    pub include_optimization_suggestions: Option<bool>,
    /// Report output format: html, markdown or json (default html)
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateParams {
    /// Show detailed validation information (default true)
    pub show_details: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddProjectParams {
    /// Project name
    pub name: String,
    /// Project directory path
    pub path: String,
    /// Base branch name (default main)
    pub base_branch: Option<String>,
    /// Target branch name (default develop)
    pub target_branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickAnalysisParams {
    /// Optional message describing what to focus on in analysis
    pub message: Option<String>,
}

//! rmcp 服务端：把 [`TeamTools`] 暴露为 MCP 工具，stdio 传输

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt,
};
use std::sync::Arc;

use super::params::{AddProjectParams, AnalyzeParams, QuickAnalysisParams, SetupParams, ValidateParams};
use super::tools::{tool_error, TeamTools};
use crate::errors::AppError;

const INSTRUCTIONS: &str = "Team code review across several Git repositories. \
Configure projects with setup_team_projects or add_team_project, check them with \
validate_team_config, then run analyze_team_projects or quick_team_analysis to \
compare base and target branches and write a report.";

#[derive(Clone)]
pub struct TeamReviewServer {
    tools: Arc<TeamTools>,
    tool_router: ToolRouter<TeamReviewServer>,
}

fn text_result(label: &str, outcome: Result<String, AppError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            tracing::warn!("工具执行失败 ({}): {}", label, e);
            CallToolResult::error(vec![Content::text(tool_error(label, &e))])
        }
    }
}

#[tool_router]
impl TeamReviewServer {
    pub fn new(tools: TeamTools) -> Self {
        Self {
            tools: Arc::new(tools),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "setup_team_projects",
        description = "Setup team projects configuration from environment variables or a config file"
    )]
    async fn setup_team_projects(
        &self,
        Parameters(params): Parameters<SetupParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result("Setup failed", self.tools.setup(params)))
    }

    #[tool(
        name = "analyze_team_projects",
        description = "Analyze branch differences across all configured team projects and generate a report"
    )]
    async fn analyze_team_projects(
        &self,
        Parameters(params): Parameters<AnalyzeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result("Analysis failed", self.tools.analyze(params).await))
    }

    #[tool(
        name = "validate_team_config",
        description = "Validate that every configured project path exists and is a Git repository"
    )]
    async fn validate_team_config(
        &self,
        Parameters(params): Parameters<ValidateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result("Validation failed", Ok(self.tools.validate(params))))
    }

    #[tool(
        name = "add_team_project",
        description = "Add or replace a single project in the team configuration"
    )]
    async fn add_team_project(
        &self,
        Parameters(params): Parameters<AddProjectParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result("Failed to add project", self.tools.add_project(params)))
    }

    #[tool(
        name = "list_team_projects",
        description = "List all configured team projects"
    )]
    async fn list_team_projects(&self) -> Result<CallToolResult, ErrorData> {
        Ok(text_result("Failed to list projects", Ok(self.tools.list_projects())))
    }

    #[tool(
        name = "quick_team_analysis",
        description = "One-click analysis for all configured team projects with smart defaults"
    )]
    async fn quick_team_analysis(
        &self,
        Parameters(params): Parameters<QuickAnalysisParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(
            "Analysis failed",
            self.tools.quick_analysis(params).await,
        ))
    }
}

#[tool_handler]
impl ServerHandler for TeamReviewServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

impl TeamReviewServer {
    /// 已注册的工具名，按注册顺序
    pub fn tool_names() -> Vec<String> {
        Self::tool_router()
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }
}

/// 在 stdin/stdout 上运行服务直到客户端断开
pub async fn serve_stdio(server: TeamReviewServer) -> Result<(), AppError> {
    tracing::info!("MCP 服务启动 (stdio)");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| AppError::Generic(format!("MCP initialization failed: {}", e)))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| AppError::Generic(format!("MCP service stopped unexpectedly: {}", e)))?;
    tracing::info!("MCP 服务结束: {:?}", reason);
    Ok(())
}

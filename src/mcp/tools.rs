//! 团队分析工具的实现，与传输层无关
//!
//! 每个方法对应一个 MCP 工具，返回给调用方的纯文本。

use std::path::{Path, PathBuf};

use super::params::{AddProjectParams, AnalyzeParams, QuickAnalysisParams, SetupParams, ValidateParams};
use crate::analysis::{AnalysisOptions, ProjectAnalyzer};
use crate::config::registry::{DEFAULT_BASE_BRANCH, DEFAULT_TARGET_BRANCH};
use crate::config::{absolute_path, RegistryStore, SetupSource, DEFAULT_SETUP_FILE};
use crate::errors::{AppError, ConfigError};
use crate::report::{write_report, ReportFormat, DEFAULT_OUTPUT_DIR};
use crate::types::{AggregateAnalysisResult, Project};

pub const DEFAULT_QUICK_MESSAGE: &str = "Complete team analysis";

/// 工具失败时返回的文本
pub fn tool_error(label: &str, error: &AppError) -> String {
    format!("Error: {}: {}", label, error)
}

pub struct TeamTools {
    analyzer: ProjectAnalyzer,
    store: RegistryStore,
    analysis: AnalysisOptions,
    report_dir: PathBuf,
}

impl TeamTools {
    pub fn new(analyzer: ProjectAnalyzer, store: RegistryStore, analysis: AnalysisOptions) -> Self {
        Self {
            analyzer,
            store,
            analysis,
            report_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// `quick_team_analysis` 及未指定 `outputPath` 时使用的目录
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn setup(&self, params: SetupParams) -> Result<String, AppError> {
        let source = match params.mode.as_deref().unwrap_or("env") {
            "env" => SetupSource::Env,
            "file" => SetupSource::File(PathBuf::from(
                params.config_path.as_deref().unwrap_or(DEFAULT_SETUP_FILE),
            )),
            other => {
                return Err(ConfigError::Other(format!(
                    "Unknown setup mode: {} (expected env or file)",
                    other
                ))
                .into())
            }
        };

        let outcome = self.store.setup(&source)?;
        let projects = outcome
            .registry
            .projects()
            .iter()
            .map(|p| format!("- {}: {} ({})", p.name, p.path.display(), p.branch_label()))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "✅ Team projects setup successful!\n\n{}\n\nConfigured projects:\n{}",
            outcome.message, projects
        ))
    }

    pub async fn analyze(&self, params: AnalyzeParams) -> Result<String, AppError> {
        let format = match params.format.as_deref() {
            Some(raw) => raw.parse::<ReportFormat>().map_err(ConfigError::Other)?,
            None => ReportFormat::Html,
        };
        let options = AnalysisOptions {
            include_risk_analysis: params.include_risk_analysis.unwrap_or(true),
            include_optimization_suggestions: params
                .include_optimization_suggestions
                .unwrap_or(true),
            ..self.analysis.clone()
        };
        let dir = params
            .output_path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.report_dir.clone());

        self.run_analysis(&options, &dir, format).await
    }

    pub fn validate(&self, params: ValidateParams) -> String {
        let report = self.store.load().validate();
        let verdict = if report.is_valid() {
            "✅ Configuration valid"
        } else {
            "❌ Configuration invalid"
        };
        format!(
            "{}\n\n{}",
            verdict,
            report.summary(params.show_details.unwrap_or(true))
        )
    }

    pub fn add_project(&self, params: AddProjectParams) -> Result<String, AppError> {
        let path = absolute_path(&params.path)?;
        let project = Project::new(
            params.name,
            path,
            params.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH),
            params.target_branch.as_deref().unwrap_or(DEFAULT_TARGET_BRANCH),
        );
        let text = format!(
            "✅ Project added successfully!\n\nProject: {}\nPath: {}\nBranches: {}",
            project.name,
            project.path.display(),
            project.branch_label()
        );

        self.store.add(project)?;
        Ok(text)
    }

    pub fn list_projects(&self) -> String {
        let registry = self.store.load();
        if registry.is_empty() {
            return "📋 No projects configured\n\nUse setup_team_projects or add_team_project to get started."
                .to_string();
        }

        let list = registry
            .projects()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "{}. {}\n   Path: {}\n   Branches: {}",
                    i + 1,
                    p.name,
                    p.path.display(),
                    p.branch_label()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("📋 Configured Team Projects\n\n{}", list)
    }

    /// 全部分析开关打开、HTML 报告，末尾附上调用方的说明
    pub async fn quick_analysis(&self, params: QuickAnalysisParams) -> Result<String, AppError> {
        let options = AnalysisOptions {
            include_risk_analysis: true,
            include_optimization_suggestions: true,
            ..self.analysis.clone()
        };
        let text = self
            .run_analysis(&options, &self.report_dir, ReportFormat::Html)
            .await?;
        let message = params.message.as_deref().unwrap_or(DEFAULT_QUICK_MESSAGE);
        Ok(format!("{}\n\n{}", text, message))
    }

    async fn run_analysis(
        &self,
        options: &AnalysisOptions,
        dir: &Path,
        format: ReportFormat,
    ) -> Result<String, AppError> {
        let registry = self.store.load_non_empty()?;
        tracing::info!("开始分析 {} 个项目", registry.projects().len());

        let result = self
            .analyzer
            .analyze_multiple_projects(registry.projects(), options)
            .await?;
        let path = write_report(&result, dir, format).await?;

        Ok(completion_text(&result, registry.projects().len(), &path))
    }
}

fn completion_text(result: &AggregateAnalysisResult, analyzed: usize, path: &Path) -> String {
    let summary = result
        .summary
        .iter()
        .map(|row| {
            format!(
                "- {}: {} ({} changes, {} risks)",
                row.project,
                row.status.as_str(),
                row.changes,
                row.risks
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "📊 Team analysis completed!\n\nAnalyzed {} projects\nReport generated: {}\n\nSummary:\n{}",
        analyzed,
        path.display(),
        summary
    )
}

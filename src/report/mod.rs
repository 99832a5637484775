//! 报告渲染：把多项目分析结果输出为 HTML、Markdown 或 JSON 文件

pub mod html;
pub mod markdown;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::AppError;
use crate::types::AggregateAnalysisResult;

pub use html::render_html;
pub use markdown::{render_markdown, MAX_CHANGES_PER_PROJECT};

/// 报告文件名前缀
pub const REPORT_PREFIX: &str = "team-analysis";

/// 未指定输出目录时的报告目录
pub const DEFAULT_OUTPUT_DIR: &str = "./team-analysis-reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!(
                "Unsupported report format: {} (expected html, markdown or json)",
                s
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

pub fn render(result: &AggregateAnalysisResult, format: ReportFormat) -> Result<String, AppError> {
    match format {
        ReportFormat::Html => Ok(render_html(result)),
        ReportFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| AppError::Generic(format!("Failed to serialize report: {}", e))),
        ReportFormat::Markdown => Ok(render_markdown(result)),
    }
}

/// `team-analysis-<timestamp>.<ext>`, timestamp taken from the analysis date
pub fn report_file_name(result: &AggregateAnalysisResult, format: ReportFormat) -> String {
    format!(
        "{}-{}.{}",
        REPORT_PREFIX,
        result.analysis_date.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        format.extension()
    )
}

/// 渲染并写入报告文件，目录不存在时自动创建
pub async fn write_report(
    result: &AggregateAnalysisResult,
    dir: &Path,
    format: ReportFormat,
) -> Result<PathBuf, AppError> {
    let content = render(result, format)?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::IO(format!("creating report directory {}", dir.display()), e))?;

    let path = dir.join(report_file_name(result, format));
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| AppError::IO(format!("writing report {}", path.display()), e))?;

    tracing::info!("报告已保存到: {}", path.display());
    Ok(path)
}

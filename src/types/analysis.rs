use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::{
    docs::DocumentationCorpus,
    change::FileChange,
    findings::{OptimizationSuggestion, RiskReport},
    git::GitStatusSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Success => "success",
            AnalysisStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPair {
    pub base: String,
    pub target: String,
}

/// 行数统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTotals {
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: usize,
}

impl ChangeTotals {
    pub fn from_changes(changes: &[FileChange]) -> Self {
        Self {
            lines_added: changes.iter().map(|c| c.additions).sum(),
            lines_deleted: changes.iter().map(|c| c.deletions).sum(),
            files_changed: changes.len(),
        }
    }
}

/// 单个项目的完整分析结果（只对成功的项目生成）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysisResult {
    pub project: String,
    pub path: PathBuf,
    pub branches: BranchPair,
    pub status: AnalysisStatus,
    pub git_status: GitStatusSnapshot,
    pub changes: Vec<FileChange>,
    pub risks: RiskReport,
    pub optimizations: Vec<OptimizationSuggestion>,
    pub documentation: DocumentationCorpus,
    pub analysis: ChangeTotals,
}

/// 汇总表中的一行；失败时只带 error，不带 branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project: String,
    pub status: AnalysisStatus,
    pub changes: usize,
    pub risks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectSummary {
    pub fn success(result: &ProjectAnalysisResult) -> Self {
        Self {
            project: result.project.clone(),
            status: AnalysisStatus::Success,
            changes: result.changes.len(),
            risks: result.risks.total,
            branch: Some(format!("{} -> {}", result.branches.base, result.branches.target)),
            error: None,
        }
    }

    pub fn failure(project: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            status: AnalysisStatus::Error,
            changes: 0,
            risks: 0,
            branch: None,
            error: Some(error.into()),
        }
    }
}

/// 多项目分析的最终结果，报告渲染的唯一输入
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateAnalysisResult {
    pub summary: Vec<ProjectSummary>,
    pub projects: Vec<ProjectAnalysisResult>,
    pub total_risks: usize,
    pub total_changes: usize,
    pub analysis_date: DateTime<Utc>,
}

impl AggregateAnalysisResult {
    pub fn failed_count(&self) -> usize {
        self.summary
            .iter()
            .filter(|row| row.status == AnalysisStatus::Error)
            .count()
    }
}

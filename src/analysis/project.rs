use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    classifier::classify_changes,
    diagnostics::{DiagnosticSink, ProjectScope, TracingSink},
    docs::{DocumentationConfig, DocumentationIndexer},
    matching::MatchPolicy,
    optimization::OptimizationEngine,
    risk::RiskEngine,
};
use crate::{
    errors::{AppError, BranchRole, GitError},
    git::VcsClient,
    logging::OperationTimer,
    types::{
        AnalysisStatus, BranchPair, ChangeTotals, DiffFileStat, DiffRange, Project,
        ProjectAnalysisResult, RiskReport,
    },
};

/// 每次运行的分析开关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub include_risk_analysis: bool,
    pub include_optimization_suggestions: bool,
    /// 同时分析的项目数，<= 1 时顺序执行
    pub concurrency: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_risk_analysis: true,
            include_optimization_suggestions: true,
            concurrency: 1,
        }
    }
}

/// 单项目分析编排：VCS 状态 -> 分支 diff -> 分类 -> 文档索引 -> 风险/优化
pub struct ProjectAnalyzer {
    pub(super) vcs: Arc<dyn VcsClient>,
    indexer: DocumentationIndexer,
    risk_engine: RiskEngine,
    optimization_engine: OptimizationEngine,
    pub(super) diagnostics: Arc<dyn DiagnosticSink>,
}

impl ProjectAnalyzer {
    pub fn new(
        vcs: Arc<dyn VcsClient>,
        documentation: DocumentationConfig,
        matching: MatchPolicy,
    ) -> Self {
        Self {
            vcs,
            indexer: DocumentationIndexer::new(documentation),
            risk_engine: RiskEngine::new(matching.clone()),
            optimization_engine: OptimizationEngine::new(matching),
            diagnostics: Arc::new(TracingSink),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_risk_engine(mut self, engine: RiskEngine) -> Self {
        self.risk_engine = engine;
        self
    }

    pub fn with_optimization_engine(mut self, engine: OptimizationEngine) -> Self {
        self.optimization_engine = engine;
        self
    }

    /// 分析单个项目
    ///
    /// Fails only when the VCS layer cannot produce status or diff data.
    /// Documentation problems degrade to an empty or partial corpus.
    pub async fn analyze_project(
        &self,
        project: &Project,
        options: &AnalysisOptions,
    ) -> Result<ProjectAnalysisResult, AppError> {
        let timer = OperationTimer::new("analyze_project")
            .with_metadata("project", &project.name)
            .with_metadata("branches", &project.branch_label());

        let result = self.run_analysis(project, options).await;
        timer.finish_with(result.is_ok());
        result
    }

    async fn run_analysis(
        &self,
        project: &Project,
        options: &AnalysisOptions,
    ) -> Result<ProjectAnalysisResult, AppError> {
        let git_status = self.vcs.status(&project.path).await?;
        let stats = self.branch_diff(project).await?;
        let changes = classify_changes(&stats);

        let scope = ProjectScope::new(self.diagnostics.as_ref(), &project.name);
        let documentation = self.indexer.index(&project.path, &scope).await;

        let risks = if options.include_risk_analysis {
            self.risk_engine.analyze(&changes, &documentation)
        } else {
            RiskReport::default()
        };

        let optimizations = if options.include_optimization_suggestions {
            self.optimization_engine.suggest(&changes, &documentation)
        } else {
            Vec::new()
        };

        tracing::info!(
            project = %project.name,
            files = changes.len(),
            risks = risks.total,
            suggestions = optimizations.len(),
            documents = documentation.documents.len(),
            "项目分析完成"
        );

        Ok(ProjectAnalysisResult {
            project: project.name.clone(),
            path: project.path.clone(),
            branches: BranchPair {
                base: project.base_branch.clone(),
                target: project.target_branch.clone(),
            },
            status: AnalysisStatus::Success,
            git_status,
            analysis: ChangeTotals::from_changes(&changes),
            changes,
            risks,
            optimizations,
            documentation,
        })
    }

    /// 原始 diff 文本（分支校验与分析时一致）
    pub async fn diff_text(&self, project: &Project) -> Result<String, AppError> {
        let range = self.checked_range(project).await?;
        Ok(self.vcs.diff_text(&project.path, &range).await?)
    }

    async fn branch_diff(&self, project: &Project) -> Result<Vec<DiffFileStat>, GitError> {
        let range = self.checked_range(project).await?;
        self.vcs.diff_summary(&project.path, &range).await
    }

    /// Both branches must exist locally before diffing.
    async fn checked_range(&self, project: &Project) -> Result<DiffRange, GitError> {
        let branches = self.vcs.local_branches(&project.path).await?;

        if !branches.contains(&project.base_branch) {
            return Err(GitError::BranchNotFound {
                role: BranchRole::Base,
                branch: project.base_branch.clone(),
            });
        }
        if !branches.contains(&project.target_branch) {
            return Err(GitError::BranchNotFound {
                role: BranchRole::Target,
                branch: project.target_branch.clone(),
            });
        }

        Ok(DiffRange::new(&project.base_branch, &project.target_branch))
    }
}

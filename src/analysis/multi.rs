use chrono::{DateTime, Utc};
use futures_util::future::FutureExt;
use futures_util::stream::{self, StreamExt};

use super::{
    diagnostics::{Diagnostic, DiagnosticKind},
    project::{AnalysisOptions, ProjectAnalyzer},
};
use crate::{
    errors::{AppError, ConfigError},
    types::{AggregateAnalysisResult, Project, ProjectAnalysisResult, ProjectSummary},
};

/// 在开始分析之前校验项目列表
pub fn validate_projects(projects: &[Project]) -> Result<(), ConfigError> {
    if projects.is_empty() {
        return Err(ConfigError::NoProjects);
    }

    for project in projects {
        let entry = if project.name.is_empty() {
            project.path.display().to_string()
        } else {
            project.name.clone()
        };
        let reason = if project.name.trim().is_empty() {
            Some("name must not be empty")
        } else if project.base_branch.trim().is_empty() {
            Some("base branch must not be empty")
        } else if project.target_branch.trim().is_empty() {
            Some("target branch must not be empty")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ConfigError::InvalidProject {
                entry,
                reason: reason.to_string(),
            });
        }
    }

    Ok(())
}

/// Folds per-project outcomes (in registry order) into the final result.
pub fn aggregate(
    outcomes: Vec<(String, Result<ProjectAnalysisResult, AppError>)>,
    analysis_date: DateTime<Utc>,
) -> AggregateAnalysisResult {
    let initial = AggregateAnalysisResult {
        summary: Vec::with_capacity(outcomes.len()),
        projects: Vec::new(),
        total_risks: 0,
        total_changes: 0,
        analysis_date,
    };

    outcomes
        .into_iter()
        .fold(initial, |mut acc, (name, outcome)| {
            match outcome {
                Ok(result) => {
                    acc.summary.push(ProjectSummary::success(&result));
                    acc.total_risks += result.risks.total;
                    acc.total_changes += result.changes.len();
                    acc.projects.push(result);
                }
                Err(e) => acc.summary.push(ProjectSummary::failure(name, e.to_string())),
            }
            acc
        })
}

impl ProjectAnalyzer {
    /// 分析多个项目，单个项目失败不影响其它项目
    pub async fn analyze_multiple_projects(
        &self,
        projects: &[Project],
        options: &AnalysisOptions,
    ) -> Result<AggregateAnalysisResult, AppError> {
        validate_projects(projects)?;

        let fan_out = options.concurrency.max(1);
        tracing::info!(
            "开始分析 {} 个项目 (concurrency = {})",
            projects.len(),
            fan_out
        );

        // `buffered` yields results in input order regardless of completion order.
        let futures: Vec<_> = projects
            .iter()
            .map(|project| async move {
                let outcome = self.analyze_project(project, options).await;
                if let Err(e) = &outcome {
                    self.diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::ProjectFailed,
                            format!("Failed to analyze {}: {}", project.name, e),
                        )
                        .with_project(&project.name)
                        .with_subject(&project.path),
                    );
                }
                (project.name.clone(), outcome)
            }
            .boxed())
            .collect();
        let outcomes: Vec<_> = stream::iter(futures)
            .buffered(fan_out)
            .collect()
            .await;

        let result = aggregate(outcomes, Utc::now());
        tracing::info!(
            "分析完成: {} 个项目, {} 个失败, {} 个变更文件, {} 个风险",
            result.summary.len(),
            result.failed_count(),
            result.total_changes,
            result.total_risks
        );
        Ok(result)
    }
}

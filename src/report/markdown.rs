use crate::types::{AggregateAnalysisResult, AnalysisStatus, ProjectAnalysisResult};

/// 每个项目在报告中列出的最大变更文件数
pub const MAX_CHANGES_PER_PROJECT: usize = 10;

pub fn render_markdown(result: &AggregateAnalysisResult) -> String {
    let mut md = String::new();
    md.push_str("# 📊 Team Code Analysis Report\n\n");
    md.push_str(&format!(
        "Generated on {}\n\n",
        result.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Total Projects:** {}\n", result.summary.len()));
    md.push_str(&format!("- **Failed Projects:** {}\n", result.failed_count()));
    md.push_str(&format!("- **Total Changes:** {}\n", result.total_changes));
    md.push_str(&format!("- **Total Risks:** {}\n\n", result.total_risks));

    md.push_str("| Project | Status | Branches | Changes | Risks |\n");
    md.push_str("|---|---|---|---|---|\n");
    for row in &result.summary {
        let status = match row.status {
            AnalysisStatus::Success => "✅ success".to_string(),
            AnalysisStatus::Error => format!("❌ {}", row.error.as_deref().unwrap_or("error")),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&row.project),
            escape_cell(&status),
            escape_cell(row.branch.as_deref().unwrap_or("-")),
            row.changes,
            row.risks
        ));
    }

    md.push_str("\n## Projects Analysis\n\n");
    let sections: Vec<String> = result.projects.iter().map(render_project).collect();
    md.push_str(&sections.join("\n---\n\n"));

    md
}

fn render_project(project: &ProjectAnalysisResult) -> String {
    let mut md = String::new();
    md.push_str(&format!("### {}\n\n", project.project));
    md.push_str(&format!("**Path:** `{}`  \n", project.path.display()));
    md.push_str(&format!(
        "**Branches:** {} → {}\n\n",
        project.branches.base, project.branches.target
    ));
    md.push_str(&format!(
        "**Analysis:** {} files changed, {} additions (+), {} deletions (-)\n\n",
        project.analysis.files_changed, project.analysis.lines_added, project.analysis.lines_deleted
    ));

    md.push_str("#### Changes\n\n");
    if project.changes.is_empty() {
        md.push_str("No changes detected.\n");
    } else {
        md.push_str("| File | Type | + | - | Risk |\n");
        md.push_str("|---|---|---|---|---|\n");
        for change in project.changes.iter().take(MAX_CHANGES_PER_PROJECT) {
            md.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                escape_cell(&change.file),
                change.file_type.as_str(),
                change.additions,
                change.deletions,
                change.risk_level
            ));
        }
        let hidden = project.changes.len().saturating_sub(MAX_CHANGES_PER_PROJECT);
        if hidden > 0 {
            md.push_str(&format!("\n_… and {} more files_\n", hidden));
        }
    }

    if project.risks.total > 0 {
        md.push_str("\n#### Risks\n\n");
        for risk in project.risks.iter() {
            md.push_str(&format!(
                "- **[{}]** `{}` ({}): {}\n",
                risk.severity,
                risk.file,
                risk.risk_type.as_str(),
                risk.message
            ));
            if !risk.context_info.is_empty() {
                md.push_str(&format!("  > {}\n", risk.context_info));
            }
        }
    }

    if !project.optimizations.is_empty() {
        md.push_str("\n#### Suggestions\n\n");
        for suggestion in &project.optimizations {
            md.push_str(&format!(
                "- **[{}]** `{}` ({}): {}\n  > {}\n",
                suggestion.priority,
                suggestion.file,
                suggestion.suggestion_type.as_str(),
                suggestion.suggestion,
                suggestion.reasoning
            ));
        }
    }

    if project.documentation.has_documents {
        md.push_str(&format!(
            "\n#### Documentation\n\n{} documents (requirements: {}, architecture: {}, apis: {})\n",
            project.documentation.documents.len(),
            project.documentation.requirements().count(),
            project.documentation.architecture().count(),
            project.documentation.apis().count()
        ));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::classify;
    use crate::types::{
        BranchPair, ChangeTotals, DiffFileStat, DocumentationCorpus, GitStatusSnapshot,
        ProjectSummary, RiskReport,
    };
    use chrono::Utc;

    fn project_with(files: usize) -> ProjectAnalysisResult {
        let changes: Vec<_> = (0..files)
            .map(|i| classify(&DiffFileStat::new(format!("src/f{}.rs", i), 3, 1)))
            .collect();
        ProjectAnalysisResult {
            project: "web".to_string(),
            path: "/srv/web".into(),
            branches: BranchPair {
                base: "main".to_string(),
                target: "develop".to_string(),
            },
            status: AnalysisStatus::Success,
            git_status: GitStatusSnapshot::default(),
            analysis: ChangeTotals::from_changes(&changes),
            changes,
            risks: RiskReport::default(),
            optimizations: Vec::new(),
            documentation: DocumentationCorpus::empty(),
        }
    }

    #[test]
    fn test_markdown_limits_change_rows() {
        let project = project_with(12);
        let result = AggregateAnalysisResult {
            summary: vec![
                ProjectSummary::success(&project),
                ProjectSummary::failure("api", "Git analysis failed: Target branch 'develop' not found"),
            ],
            total_changes: project.changes.len(),
            projects: vec![project],
            total_risks: 0,
            analysis_date: Utc::now(),
        };

        let md = render_markdown(&result);
        assert!(md.starts_with("# 📊 Team Code Analysis Report"));
        assert!(md.contains("- **Total Projects:** 2"));
        assert!(md.contains("- **Failed Projects:** 1"));
        assert!(md.contains("| web | ✅ success | main -> develop | 12 | 0 |"));
        assert!(md.contains("❌ Git analysis failed: Target branch 'develop' not found"));
        assert!(md.contains("`src/f9.rs`"));
        assert!(!md.contains("`src/f10.rs`"));
        assert!(md.contains("and 2 more files"));
    }

    #[test]
    fn test_summary_cells_are_escaped() {
        let mut project = project_with(1);
        project.project = "web|admin".to_string();
        project.branches.target = "feature|x".to_string();
        let result = AggregateAnalysisResult {
            summary: vec![ProjectSummary::success(&project)],
            total_changes: 1,
            projects: vec![project],
            total_risks: 0,
            analysis_date: Utc::now(),
        };

        let md = render_markdown(&result);
        assert!(md.contains("| web\\|admin | ✅ success | main -> feature\\|x | 1 | 0 |"));
    }

    #[test]
    fn test_markdown_without_changes() {
        let project = project_with(0);
        let result = AggregateAnalysisResult {
            summary: vec![ProjectSummary::success(&project)],
            projects: vec![project],
            total_risks: 0,
            total_changes: 0,
            analysis_date: Utc::now(),
        };
        let md = render_markdown(&result);
        assert!(md.contains("No changes detected."));
        assert!(!md.contains("#### Risks"));
    }
}

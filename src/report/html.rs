use crate::types::{
    AggregateAnalysisResult, AnalysisStatus, Level, ProjectAnalysisResult, RiskFinding,
};

use super::markdown::MAX_CHANGES_PER_PROJECT;

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f7fa; }
        .container { max-width: 1200px; margin: 0 auto; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 10px; margin-bottom: 30px; }
        .header h1 { margin: 0; font-size: 2.2em; }
        .summary { display: flex; gap: 20px; margin-bottom: 30px; flex-wrap: wrap; }
        .summary-card { background: white; padding: 20px; border-radius: 10px; text-align: center; flex: 1; min-width: 180px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .summary-card h3 { margin: 0 0 10px 0; color: #666; font-size: 0.9em; text-transform: uppercase; }
        .summary-card .value { font-size: 2em; font-weight: bold; color: #333; }
        table { width: 100%; border-collapse: collapse; background: white; margin-bottom: 20px; }
        th { background: #667eea; color: white; padding: 10px; text-align: left; }
        td { padding: 8px 10px; border-bottom: 1px solid #eee; }
        .project-card { background: white; margin-bottom: 30px; border-radius: 10px; overflow: hidden; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }
        .project-card h3 { background: #667eea; color: white; margin: 0; padding: 20px; }
        .section { padding: 20px; border-bottom: 1px solid #eee; }
        .documentation { background: #f8f9ff; }
        .doc-preview { margin: 8px 0 0 0; color: #666; font-size: 0.9em; white-space: pre-wrap; }
        .risks { background: #fff5f5; }
        .optimizations { background: #f0fdf4; }
        .item { background: white; padding: 12px; margin-bottom: 10px; border-radius: 8px; border-left: 4px solid #10b981; }
        .level-high { border-left-color: #dc2626; }
        .level-medium { border-left-color: #f59e0b; }
        .file-path { color: #666; font-size: 0.9em; margin-top: 5px; font-family: monospace; }
        .context-info { background: #f3f4f6; padding: 8px; margin-top: 8px; border-radius: 5px; font-size: 0.9em; }
        .risk-low { color: #059669; }
        .risk-medium { color: #f59e0b; }
        .risk-high { color: #dc2626; }
"#;

/// 渲染为独立的 HTML 页面（样式内联，不依赖外部资源）
pub fn render_html(result: &AggregateAnalysisResult) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("    <title>Team Code Analysis Report</title>\n");
    html.push_str(&format!("    <style>{}    </style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");

    html.push_str(&format!(
        "<div class=\"header\">\n<h1>📊 Team Code Analysis Report</h1>\n<p>Generated on {}</p>\n</div>\n",
        result.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    html.push_str("<div class=\"summary\">\n");
    summary_card(&mut html, "Total Projects", &result.summary.len().to_string(), "");
    summary_card(&mut html, "Failed Projects", &result.failed_count().to_string(), "");
    summary_card(&mut html, "Total Changes", &result.total_changes.to_string(), "");
    summary_card(
        &mut html,
        "Total Risks",
        &result.total_risks.to_string(),
        total_risk_class(result.total_risks),
    );
    html.push_str("</div>\n");

    html.push_str("<table class=\"summary-table\">\n");
    html.push_str("<tr><th>Project</th><th>Status</th><th>Branches</th><th>Changes</th><th>Risks</th></tr>\n");
    for row in &result.summary {
        let status = match row.status {
            AnalysisStatus::Success => "<span class=\"risk-low\">success</span>".to_string(),
            AnalysisStatus::Error => format!(
                "<span class=\"risk-high\">error: {}</span>",
                escape_html(row.error.as_deref().unwrap_or("unknown error"))
            ),
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.project),
            status,
            escape_html(row.branch.as_deref().unwrap_or("-")),
            row.changes,
            row.risks
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<div class=\"projects\">\n");
    for project in &result.projects {
        html.push_str(&render_project(project));
    }
    html.push_str("</div>\n</div>\n</body>\n</html>\n");

    html
}

fn summary_card(html: &mut String, title: &str, value: &str, class: &str) {
    html.push_str(&format!(
        "<div class=\"summary-card\"><h3>{}</h3><div class=\"value {}\">{}</div></div>\n",
        title, class, value
    ));
}

fn total_risk_class(total: usize) -> &'static str {
    match total {
        0..=5 => "risk-low",
        6..=10 => "risk-medium",
        _ => "risk-high",
    }
}

fn level_class(level: Level) -> &'static str {
    match level {
        Level::Low => "level-low",
        Level::Medium => "level-medium",
        Level::High => "level-high",
    }
}

fn render_project(project: &ProjectAnalysisResult) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"project-card\">\n");
    html.push_str(&format!("<h3>{}</h3>\n", escape_html(&project.project)));

    html.push_str("<div class=\"section\">\n");
    html.push_str(&format!(
        "<p><strong>Path:</strong> {}</p>\n",
        escape_html(&project.path.display().to_string())
    ));
    html.push_str(&format!(
        "<p><strong>Branches:</strong> {} → {}</p>\n",
        escape_html(&project.branches.base),
        escape_html(&project.branches.target)
    ));
    html.push_str(&format!(
        "<p><strong>Analysis:</strong> {} files changed, {} additions (+), {} deletions (-)</p>\n",
        project.analysis.files_changed, project.analysis.lines_added, project.analysis.lines_deleted
    ));
    html.push_str("</div>\n");

    html.push_str(&render_documentation(project));

    html.push_str("<div class=\"section changes\">\n<h4>Changes</h4>\n");
    if project.changes.is_empty() {
        html.push_str("<p>No changes detected.</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>File</th><th>Type</th><th>+</th><th>-</th><th>Risk</th></tr>\n");
        for change in project.changes.iter().take(MAX_CHANGES_PER_PROJECT) {
            html.push_str(&format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td><td class=\"risk-{}\">{}</td></tr>\n",
                escape_html(&change.file),
                change.file_type.as_str(),
                change.additions,
                change.deletions,
                change.risk_level,
                change.risk_level
            ));
        }
        html.push_str("</table>\n");
        let hidden = project.changes.len().saturating_sub(MAX_CHANGES_PER_PROJECT);
        if hidden > 0 {
            html.push_str(&format!("<p>… and {} more files</p>\n", hidden));
        }
    }
    html.push_str("</div>\n");

    if project.risks.total > 0 {
        html.push_str(&format!(
            "<div class=\"section risks\">\n<h4>⚠️ Risks Identified ({})</h4>\n",
            project.risks.total
        ));
        for risk in project.risks.iter() {
            html.push_str(&render_risk(risk));
        }
        html.push_str("</div>\n");
    }

    if !project.optimizations.is_empty() {
        html.push_str(&format!(
            "<div class=\"section optimizations\">\n<h4>💡 Optimization Suggestions ({})</h4>\n",
            project.optimizations.len()
        ));
        for suggestion in &project.optimizations {
            html.push_str(&format!(
                "<div class=\"item {}\"><strong>[{}]</strong> {}<div class=\"file-path\">{}</div><div class=\"context-info\">{}</div></div>\n",
                level_class(suggestion.priority),
                suggestion.suggestion_type.as_str(),
                escape_html(&suggestion.suggestion),
                escape_html(&suggestion.file),
                escape_html(&suggestion.reasoning)
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
    html
}

fn render_risk(risk: &RiskFinding) -> String {
    let context = if risk.context_info.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"context-info\">{}</div>",
            escape_html(&risk.context_info)
        )
    };
    format!(
        "<div class=\"item {}\"><strong>[{}]</strong> {}<div class=\"file-path\">{}</div>{}</div>\n",
        level_class(risk.severity),
        risk.risk_type.as_str(),
        escape_html(&risk.message),
        escape_html(&risk.file),
        context
    )
}

fn render_documentation(project: &ProjectAnalysisResult) -> String {
    let docs = &project.documentation;
    if !docs.has_documents {
        return "<div class=\"section documentation\"><p>No documentation folder found</p></div>\n"
            .to_string();
    }

    let mut html = String::new();
    html.push_str("<div class=\"section documentation\">\n<h4>📄 Documentation Analysis</h4>\n");
    html.push_str(&format!(
        "<p>{} documents found (requirements: {}, architecture: {}, apis: {})</p>\n",
        docs.documents.len(),
        docs.requirements().count(),
        docs.architecture().count(),
        docs.apis().count()
    ));
    for doc in &docs.documents {
        let ellipsis = if doc.excerpt.len() < doc.full_text.len() { "..." } else { "" };
        html.push_str(&format!(
            "<div class=\"item\"><strong>{}</strong> ({})<p class=\"doc-preview\">{}{}</p></div>\n",
            escape_html(&doc.name),
            doc.category.as_str(),
            escape_html(&doc.excerpt),
            ellipsis
        ));
    }
    html.push_str("</div>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

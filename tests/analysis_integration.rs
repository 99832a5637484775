//! 多项目分析集成测试
//!
//! 使用内存中的 VcsClient 替身驱动完整的分析流程：
//! - 变更分类与风险识别
//! - 文档目录索引与上下文信息
//! - 失败隔离、顺序保持与有限并发

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use team_review::analysis::{
    AnalysisOptions, CollectingSink, DiagnosticKind, DocumentationConfig, MatchPolicy,
    ProjectAnalyzer,
};
use team_review::errors::{AppError, BranchRole, ConfigError, GitError};
use team_review::git::VcsClient;
use team_review::types::{
    AnalysisStatus, DiffFileStat, DiffRange, GitStatusSnapshot, Level, OptimizationType, Project,
    RiskType,
};

#[derive(Clone, Default)]
struct MockRepo {
    branches: Vec<&'static str>,
    stats: Vec<DiffFileStat>,
    status: GitStatusSnapshot,
    diff: String,
    delay_ms: u64,
}

impl MockRepo {
    fn with_changes(stats: Vec<DiffFileStat>) -> Self {
        Self {
            branches: vec!["main", "develop"],
            stats,
            ..Default::default()
        }
    }
}

/// 按路径返回预设数据；未登记的路径视为不可访问
#[derive(Default)]
struct MockVcs {
    repos: HashMap<PathBuf, MockRepo>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockVcs {
    fn with_repo(mut self, path: &Path, repo: MockRepo) -> Self {
        self.repos.insert(path.to_path_buf(), repo);
        self
    }

    fn repo(&self, path: &Path) -> Result<&MockRepo, GitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.repos
            .get(path)
            .ok_or_else(|| GitError::NotARepository(path.to_path_buf()))
    }
}

#[async_trait]
impl VcsClient for MockVcs {
    async fn status(&self, repo: &Path) -> Result<GitStatusSnapshot, GitError> {
        let data = self.repo(repo)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if data.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(data.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(data.status.clone())
    }

    async fn local_branches(&self, repo: &Path) -> Result<BTreeSet<String>, GitError> {
        Ok(self
            .repo(repo)?
            .branches
            .iter()
            .map(|b| b.to_string())
            .collect())
    }

    async fn diff_summary(
        &self,
        repo: &Path,
        _range: &DiffRange,
    ) -> Result<Vec<DiffFileStat>, GitError> {
        Ok(self.repo(repo)?.stats.clone())
    }

    async fn diff_text(&self, repo: &Path, _range: &DiffRange) -> Result<String, GitError> {
        Ok(self.repo(repo)?.diff.clone())
    }
}

fn analyzer(vcs: Arc<MockVcs>) -> ProjectAnalyzer {
    ProjectAnalyzer::new(vcs, DocumentationConfig::default(), MatchPolicy::default())
}

fn project(name: &str, path: &Path) -> Project {
    Project::new(name, path, "main", "develop")
}

fn write_doc(root: &Path, name: &str, content: &str) {
    let dir = root.join(".document");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn test_auth_file_with_large_change() {
    let temp_dir = TempDir::new().unwrap();
    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo::with_changes(vec![DiffFileStat::new("src/auth/login.js", 120, 10)]),
    ));

    let result = analyzer(vcs)
        .analyze_project(&project("web", temp_dir.path()), &AnalysisOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status, AnalysisStatus::Success);
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].changes, 130);
    assert_eq!(result.changes[0].risk_level, Level::High);

    assert_eq!(result.risks.security.len(), 1);
    assert_eq!(result.risks.security[0].risk_type, RiskType::Authentication);
    assert_eq!(result.risks.security[0].severity, Level::High);
    assert_eq!(result.risks.performance.len(), 1);
    assert_eq!(result.risks.performance[0].risk_type, RiskType::LargeChange);
    assert_eq!(result.risks.total, 2);

    // .js file also gets the modern-JS suggestion
    assert_eq!(result.optimizations.len(), 1);
    assert_eq!(result.optimizations[0].suggestion_type, OptimizationType::CodeQuality);

    assert_eq!(result.analysis.lines_added, 120);
    assert_eq!(result.analysis.lines_deleted, 10);
    assert_eq!(result.analysis.files_changed, 1);
    assert!(!result.documentation.has_documents);
}

#[tokio::test]
async fn test_config_path_forces_high_risk() {
    let temp_dir = TempDir::new().unwrap();
    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo::with_changes(vec![
            DiffFileStat::new("README.md", 60, 0),
            DiffFileStat::new("config/settings.json", 5, 2),
        ]),
    ));

    let result = analyzer(vcs)
        .analyze_project(&project("svc", temp_dir.path()), &AnalysisOptions::default())
        .await
        .unwrap();

    // sorted by total changed lines, descending
    assert_eq!(result.changes[0].file, "README.md");
    assert_eq!(result.changes[0].risk_level, Level::Medium);
    assert_eq!(result.changes[1].file, "config/settings.json");
    assert_eq!(result.changes[1].changes, 7);
    assert_eq!(result.changes[1].risk_level, Level::High);
}

#[tokio::test]
async fn test_requirements_document_adds_context() {
    let temp_dir = TempDir::new().unwrap();
    write_doc(
        temp_dir.path(),
        "requirements.md",
        "The login endpoint must lock accounts after 5 failures.",
    );
    write_doc(temp_dir.path(), "diagram.png", "binary");

    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo::with_changes(vec![DiffFileStat::new("src/login.js", 3, 1)]),
    ));

    let result = analyzer(vcs)
        .analyze_project(&project("web", temp_dir.path()), &AnalysisOptions::default())
        .await
        .unwrap();

    assert!(result.documentation.has_documents);
    assert_eq!(result.documentation.documents.len(), 1);
    assert_eq!(result.documentation.requirements().count(), 1);

    let auth = &result.risks.security[0];
    assert_eq!(auth.risk_type, RiskType::Authentication);
    assert!(!auth.context_info.is_empty());
    assert!(auth.context_info.contains("Found 1 security-related documents"));
}

#[tokio::test]
async fn test_empty_project_list_fails_before_vcs() {
    let vcs = Arc::new(MockVcs::default());
    let err = analyzer(vcs.clone())
        .analyze_multiple_projects(&[], &AnalysisOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Config(ConfigError::NoProjects)));
    assert_eq!(vcs.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failure_is_isolated_and_order_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let healthy = temp_dir.path().join("healthy");
    fs::create_dir(&healthy).unwrap();

    let vcs = Arc::new(MockVcs::default().with_repo(
        &healthy,
        MockRepo::with_changes(vec![DiffFileStat::new("src/app.ts", 10, 2)]),
    ));
    let sink = Arc::new(CollectingSink::new());
    let analyzer = analyzer(vcs).with_diagnostics(sink.clone());

    let projects = vec![
        project("missing", &temp_dir.path().join("missing")),
        project("healthy", &healthy),
    ];
    let result = analyzer
        .analyze_multiple_projects(&projects, &AnalysisOptions::default())
        .await
        .unwrap();

    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.summary[0].project, "missing");
    assert_eq!(result.summary[0].status, AnalysisStatus::Error);
    assert!(result.summary[0].error.is_some());
    assert!(result.summary[0].branch.is_none());
    assert_eq!(result.summary[1].project, "healthy");
    assert_eq!(result.summary[1].status, AnalysisStatus::Success);
    assert_eq!(result.summary[1].branch.as_deref(), Some("main -> develop"));

    assert_eq!(result.projects.len(), 1);
    assert_eq!(result.projects[0].project, "healthy");
    assert_eq!(result.total_changes, 1);
    assert_eq!(result.failed_count(), 1);
    assert_eq!(sink.count(DiagnosticKind::ProjectFailed), 1);
}

#[tokio::test]
async fn test_missing_branch_is_distinguishable() {
    let temp_dir = TempDir::new().unwrap();
    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo {
            branches: vec!["main"],
            ..Default::default()
        },
    ));

    let err = analyzer(vcs)
        .analyze_project(&project("web", temp_dir.path()), &AnalysisOptions::default())
        .await
        .unwrap_err();

    let AppError::Git(git_err) = err else {
        panic!("expected a git error");
    };
    assert!(git_err.is_missing_branch());
    match git_err {
        GitError::BranchNotFound { role, branch } => {
            assert_eq!(role, BranchRole::Target);
            assert_eq!(branch, "develop");
        }
        other => panic!("unexpected git error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_branch_becomes_error_row() {
    let temp_dir = TempDir::new().unwrap();
    let stale = temp_dir.path().join("stale");
    let healthy = temp_dir.path().join("healthy");
    fs::create_dir(&stale).unwrap();
    fs::create_dir(&healthy).unwrap();

    let vcs = Arc::new(
        MockVcs::default()
            .with_repo(
                &stale,
                MockRepo {
                    branches: vec!["main"],
                    ..Default::default()
                },
            )
            .with_repo(
                &healthy,
                MockRepo::with_changes(vec![DiffFileStat::new("src/app.ts", 4, 1)]),
            ),
    );

    let projects = vec![project("stale", &stale), project("healthy", &healthy)];
    let result = analyzer(vcs)
        .analyze_multiple_projects(&projects, &AnalysisOptions::default())
        .await
        .unwrap();

    let rows: Vec<_> = result.summary.iter().map(|r| r.project.as_str()).collect();
    assert_eq!(rows, vec!["stale", "healthy"]);
    assert_eq!(result.summary[0].status, AnalysisStatus::Error);
    assert_eq!(
        result.summary[0].error.as_deref(),
        Some("Git analysis failed: Target branch 'develop' not found")
    );
    assert_eq!(result.summary[1].status, AnalysisStatus::Success);

    assert_eq!(result.projects.len(), 1);
    assert_eq!(result.projects[0].project, "healthy");
    assert_eq!(result.total_changes, 1);
}

#[tokio::test]
async fn test_disabled_analyses_yield_empty_shapes() {
    let temp_dir = TempDir::new().unwrap();
    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo::with_changes(vec![DiffFileStat::new("src/auth/login.js", 300, 0)]),
    ));
    let options = AnalysisOptions {
        include_risk_analysis: false,
        include_optimization_suggestions: false,
        concurrency: 1,
    };

    let result = analyzer(vcs)
        .analyze_project(&project("web", temp_dir.path()), &options)
        .await
        .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.risks.total, 0);
    assert!(result.risks.security.is_empty());
    assert!(result.risks.performance.is_empty());
    assert!(result.risks.code_quality.is_empty());
    assert!(result.optimizations.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["risks"]["total"], 0);
    assert!(json["optimizations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_analysis_keeps_registry_order() {
    let temp_dir = TempDir::new().unwrap();
    let mut vcs = MockVcs::default();
    let mut projects = Vec::new();
    for (i, delay) in [60u64, 5, 30].iter().enumerate() {
        let path = temp_dir.path().join(format!("p{}", i));
        fs::create_dir(&path).unwrap();
        vcs = vcs.with_repo(
            &path,
            MockRepo {
                delay_ms: *delay,
                ..MockRepo::with_changes(vec![DiffFileStat::new(format!("src/f{}.py", i), 1, 1)])
            },
        );
        projects.push(project(&format!("p{}", i), &path));
    }
    let vcs = Arc::new(vcs);

    let options = AnalysisOptions {
        concurrency: 3,
        ..AnalysisOptions::default()
    };
    let result = analyzer(vcs.clone())
        .analyze_multiple_projects(&projects, &options)
        .await
        .unwrap();

    let names: Vec<_> = result.summary.iter().map(|s| s.project.as_str()).collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
    let names: Vec<_> = result.projects.iter().map(|p| p.project.as_str()).collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
    assert!(vcs.max_in_flight.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_sequential_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let mut vcs = MockVcs::default();
    let mut projects = Vec::new();
    for i in 0..3 {
        let path = temp_dir.path().join(format!("p{}", i));
        fs::create_dir(&path).unwrap();
        vcs = vcs.with_repo(
            &path,
            MockRepo {
                delay_ms: 5,
                ..MockRepo::with_changes(Vec::new())
            },
        );
        projects.push(project(&format!("p{}", i), &path));
    }
    let vcs = Arc::new(vcs);

    analyzer(vcs.clone())
        .analyze_multiple_projects(&projects, &AnalysisOptions::default())
        .await
        .unwrap();
    assert_eq!(vcs.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let temp_dir = TempDir::new().unwrap();
    write_doc(temp_dir.path(), "b-api.md", "users endpoint");
    write_doc(temp_dir.path(), "a-arch.md", "frontend component layout");

    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo::with_changes(vec![
            DiffFileStat::new("src/api/users.js", 40, 40),
            DiffFileStat::new("src/component/Nav.jsx", 70, 5),
        ]),
    ));
    let analyzer = analyzer(vcs);
    let p = project("web", temp_dir.path());

    let first = analyzer.analyze_project(&p, &AnalysisOptions::default()).await.unwrap();
    let second = analyzer.analyze_project(&p, &AnalysisOptions::default()).await.unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(first.documentation.documents[0].name, "a-arch.md");
}

#[tokio::test]
async fn test_diff_text_checks_branches() {
    let temp_dir = TempDir::new().unwrap();
    let vcs = Arc::new(MockVcs::default().with_repo(
        temp_dir.path(),
        MockRepo {
            diff: "diff --git a/x b/x\n".to_string(),
            ..MockRepo::with_changes(Vec::new())
        },
    ));
    let analyzer = analyzer(vcs);

    let text = analyzer.diff_text(&project("web", temp_dir.path())).await.unwrap();
    assert!(text.starts_with("diff --git"));

    let wrong = Project::new("web", temp_dir.path(), "trunk", "develop");
    let err = analyzer.diff_text(&wrong).await.unwrap_err();
    assert!(err.to_string().contains("Base branch 'trunk' not found"));
}

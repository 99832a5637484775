//! 命令处理器：把解析后的参数接到配置、分析引擎和报告输出上

use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use super::commands::{
    AddArgs, AnalyzeArgs, DiffArgs, ProjectSource, SetupArgs, SetupMode, TeamReviewArgs,
    TeamReviewCommand,
};
use crate::analysis::{AnalysisOptions, ProjectAnalyzer};
use crate::config::{absolute_path, AppConfig, ProjectRegistry, RegistryStore, SetupSource};
use crate::errors::{AppError, ConfigError};
use crate::git::GitCli;
use crate::report::write_report;
use crate::types::{AggregateAnalysisResult, AnalysisStatus, Project};

pub async fn run(args: TeamReviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load(args.config.as_deref())?;
    tracing::debug!("配置加载完成: {:?}", config);
    let store = registry_store(args.registry.as_deref())?;

    match args.command {
        TeamReviewCommand::Analyze(analyze) => handle_analyze(&config, &store, &analyze).await,
        TeamReviewCommand::List(source) => handle_list(&store, &source),
        TeamReviewCommand::Validate(source) => handle_validate(&store, &source),
        TeamReviewCommand::Diff(diff) => handle_diff(&config, &store, &diff).await,
        TeamReviewCommand::Setup(setup) => handle_setup(&store, &setup),
        TeamReviewCommand::Add(add) => handle_add(&store, add),
        TeamReviewCommand::Remove { name } => handle_remove(&store, &name),
    }
}

/// 显式路径，否则主目录下的默认文件
pub fn registry_store(path: Option<&Path>) -> Result<RegistryStore, ConfigError> {
    match path {
        Some(path) => Ok(RegistryStore::new(path)),
        None => RegistryStore::default_location(),
    }
}

/// 项目文件 > 环境变量 > 已保存的项目列表
pub fn load_registry(
    store: &RegistryStore,
    source: &ProjectSource,
) -> Result<ProjectRegistry, ConfigError> {
    if let Some(path) = &source.projects {
        return ProjectRegistry::from_file(path);
    }
    if ProjectRegistry::env_configured() {
        return ProjectRegistry::from_env();
    }
    store.load_non_empty()
}

/// Command-line switches take precedence over the configuration file.
pub fn effective_options(config: &AppConfig, args: &AnalyzeArgs) -> AnalysisOptions {
    let mut options = config.analysis.clone();
    if args.no_risks {
        options.include_risk_analysis = false;
    }
    if args.no_optimizations {
        options.include_optimization_suggestions = false;
    }
    if let Some(n) = args.concurrency {
        options.concurrency = n;
    }
    options
}

pub fn build_analyzer(config: &AppConfig) -> ProjectAnalyzer {
    ProjectAnalyzer::new(
        Arc::new(GitCli::new()),
        config.documentation.clone(),
        config.matching.clone(),
    )
}

async fn handle_analyze(
    config: &AppConfig,
    store: &RegistryStore,
    args: &AnalyzeArgs,
) -> Result<(), AppError> {
    let registry = load_registry(store, &args.source)?;
    let options = effective_options(config, args);
    let analyzer = build_analyzer(config);

    println!(
        "{}",
        format!("🔍 Analyzing {} projects...", registry.projects().len())
            .bright_blue()
            .bold()
    );

    let result = analyzer
        .analyze_multiple_projects(registry.projects(), &options)
        .await?;
    let path = write_report(&result, &args.output, args.format).await?;

    print_summary(&result);
    println!(
        "\n{} {}",
        "📄 Report saved to:".bright_green(),
        path.display()
    );
    Ok(())
}

fn print_summary(result: &AggregateAnalysisResult) {
    println!("\n{}", "📊 Analysis Summary".bright_cyan().bold());
    println!("{}", "=".repeat(50).cyan());

    for row in &result.summary {
        match row.status {
            AnalysisStatus::Success => println!(
                "{} {} ({}): {} files, {} risks",
                "✅".green(),
                row.project.bold(),
                row.branch.as_deref().unwrap_or("-"),
                row.changes,
                risk_count(row.risks)
            ),
            AnalysisStatus::Error => println!(
                "{} {}: {}",
                "❌".red(),
                row.project.bold(),
                row.error.as_deref().unwrap_or("unknown error").red()
            ),
        }
    }

    println!("{}", "-".repeat(50).cyan());
    println!(
        "Projects: {}  Failed: {}  Changes: {}  Risks: {}",
        result.summary.len(),
        result.failed_count(),
        result.total_changes,
        risk_count(result.total_risks)
    );
}

fn risk_count(n: usize) -> colored::ColoredString {
    match n {
        0 => n.to_string().green(),
        1..=5 => n.to_string().yellow(),
        _ => n.to_string().red().bold(),
    }
}

fn handle_list(store: &RegistryStore, source: &ProjectSource) -> Result<(), AppError> {
    let registry = match load_registry(store, source) {
        Err(ConfigError::EmptyRegistry) => {
            println!("{}", "📋 No projects configured".yellow());
            println!("Use `team-review setup` or `team-review add` to get started.");
            return Ok(());
        }
        other => other?,
    };

    println!("{}", "📋 Configured projects".bright_cyan().bold());
    for project in registry.projects() {
        println!(
            "  • {} {} ({})",
            project.name.bold(),
            project.path.display(),
            project.branch_label().yellow()
        );
    }
    Ok(())
}

fn handle_validate(store: &RegistryStore, source: &ProjectSource) -> Result<(), AppError> {
    let registry = load_registry(store, source)?;
    let report = registry.validate();

    if report.is_valid() {
        println!("{} {}", "✅".green(), report.message());
    } else {
        println!("{} {}", "⚠️".yellow(), report.message());
    }
    Ok(())
}

async fn handle_diff(
    config: &AppConfig,
    store: &RegistryStore,
    args: &DiffArgs,
) -> Result<(), AppError> {
    let registry = load_registry(store, &args.source)?;
    let project = registry
        .find(&args.name)
        .ok_or_else(|| ConfigError::ProjectNotFound(args.name.clone()))?;

    let diff = build_analyzer(config).diff_text(project).await?;
    if diff.is_empty() {
        println!("No differences between {}", project.branch_label());
    } else {
        println!("{}", diff);
    }
    Ok(())
}

fn handle_setup(store: &RegistryStore, args: &SetupArgs) -> Result<(), AppError> {
    let source = match args.mode {
        SetupMode::Env => SetupSource::Env,
        SetupMode::File => SetupSource::File(args.file.clone()),
    };
    let outcome = store.setup(&source)?;

    println!("{} {}", "✅".green(), outcome.message);
    for project in outcome.registry.projects() {
        println!(
            "  • {} {} ({})",
            project.name.bold(),
            project.path.display(),
            project.branch_label().yellow()
        );
    }
    println!("Saved to {}", store.path().display());
    Ok(())
}

fn handle_add(store: &RegistryStore, args: AddArgs) -> Result<(), AppError> {
    let project = Project::new(
        args.name,
        absolute_path(&args.path)?,
        args.base_branch,
        args.target_branch,
    );
    let label = format!("{} ({})", project.name, project.branch_label());
    let registry = store.add(project)?;

    println!(
        "{} Project added: {} [{} configured]",
        "✅".green(),
        label.bold(),
        registry.projects().len()
    );
    Ok(())
}

fn handle_remove(store: &RegistryStore, name: &str) -> Result<(), AppError> {
    let removed = store.remove(name)?;
    println!("{} Project removed: {}", "🗑️".yellow(), removed.name.bold());
    Ok(())
}

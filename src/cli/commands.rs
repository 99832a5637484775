use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::registry::{DEFAULT_BASE_BRANCH, DEFAULT_TARGET_BRANCH};
use crate::config::DEFAULT_SETUP_FILE;
use crate::report::{ReportFormat, DEFAULT_OUTPUT_DIR};

/// team-review 主命令行参数
#[derive(Parser, Debug)]
#[clap(
    name = "team-review",
    version,
    about = "Multi-project branch diff analysis",
    long_about = "Compares a base and a target branch across several repositories, classifies the changed files, and reports risks and optimization suggestions informed by each project's documentation folder."
)]
pub struct TeamReviewArgs {
    /// Enable debug logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to <config_dir>/team-review/config.toml)
    #[clap(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Saved project list (defaults to ~/.team-code-review-config.json)
    #[clap(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: TeamReviewCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamReviewCommand {
    /// Analyze every configured project and write a report
    #[clap(alias = "an")]
    Analyze(AnalyzeArgs),

    /// List configured projects
    #[clap(alias = "ls")]
    List(ProjectSource),

    /// Check that every configured project is a Git repository
    Validate(ProjectSource),

    /// Print the raw branch diff of one project
    Diff(DiffArgs),

    /// Save the project list from environment variables or a project file
    Setup(SetupArgs),

    /// Add or replace one project in the saved list
    Add(AddArgs),

    /// Remove one project from the saved list
    #[clap(alias = "rm")]
    Remove {
        /// Project name as configured
        name: String,
    },
}

/// 项目来源：项目文件 > 环境变量 > 已保存的项目列表
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSource {
    /// Project file (.json or .toml); falls back to TEAM_PROJECTS, then the saved list
    #[clap(long = "projects", value_name = "FILE")]
    pub projects: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    #[clap(flatten)]
    pub source: ProjectSource,

    /// Report format (html|markdown|json)
    #[clap(short, long, default_value = "html", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Output directory for the report
    #[clap(short, long, default_value = DEFAULT_OUTPUT_DIR, value_name = "DIR")]
    pub output: PathBuf,

    /// Skip risk analysis
    #[clap(long = "no-risks")]
    pub no_risks: bool,

    /// Skip optimization suggestions
    #[clap(long = "no-optimizations")]
    pub no_optimizations: bool,

    /// Number of projects analyzed concurrently
    #[clap(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DiffArgs {
    /// Project name as configured
    pub name: String,

    #[clap(flatten)]
    pub source: ProjectSource,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupMode {
    /// TEAM_PROJECTS / PROJECTS
    Env,
    /// JSON or TOML project file
    File,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SetupArgs {
    /// Where the project list comes from
    #[clap(long = "from", value_enum, default_value_t = SetupMode::Env)]
    pub mode: SetupMode,

    /// Project file used with --from file
    #[clap(long, default_value = DEFAULT_SETUP_FILE, value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Project name; an existing project with this name is replaced
    pub name: String,

    /// Repository directory
    pub path: String,

    /// Base branch
    #[clap(long = "base", default_value = DEFAULT_BASE_BRANCH)]
    pub base_branch: String,

    /// Target branch
    #[clap(long = "target", default_value = DEFAULT_TARGET_BRANCH)]
    pub target_branch: String,
}

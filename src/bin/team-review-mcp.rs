// team-review MCP 服务器独立二进制
//
// 通过 stdio 与 LLM 客户端通信，日志只写 stderr

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use team_review::cli::{build_analyzer, registry_store};
use team_review::config::AppConfig;
use team_review::logging::{init_logging, LoggingConfig};
use team_review::mcp::{serve_stdio, TeamReviewServer, TeamTools};

#[derive(Parser, Debug)]
#[command(name = "team-review-mcp")]
#[command(version, about = "team-review MCP Server - exposes team analysis tools over stdio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 已保存项目列表的位置 (默认 ~/.team-code-review-config.json)
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动 MCP 服务器 (默认)
    Serve,
    /// 列出提供的工具
    ListTools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::ListTools => {
            for name in TeamReviewServer::tool_names() {
                println!("{}", name);
            }
        }
        Commands::Serve => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let store = registry_store(cli.registry.as_deref())?;
            tracing::info!("项目列表位置: {}", store.path().display());

            let tools = TeamTools::new(build_analyzer(&config), store, config.analysis.clone());
            serve_stdio(TeamReviewServer::new(tools)).await?;
        }
    }

    Ok(())
}

use clap::Parser;

use team_review::cli::{self, TeamReviewArgs};
use team_review::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = TeamReviewArgs::parse();

    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    cli::run(args).await?;
    Ok(())
}

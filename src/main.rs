use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use streamable_dl::application::{run, RunReport};
use streamable_dl::cli::Cli;

fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    println!("\n{}", "=".repeat(50));
    println!("Download complete! ({} videos processed)", summary.total());
    println!("  Downloaded: {}", summary.downloaded);
    println!("  Skipped (already exist): {}", summary.skipped);
    println!("  Failed: {}", summary.failed);
    println!("  Output directory: {}", report.output_dir.display());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("streamable_dl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.run_config();

    let acquirer = match cli.acquirer(&config.api) {
        Ok(acquirer) => acquirer,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    match run(acquirer.as_ref(), &config).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

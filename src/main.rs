use clap::Parser;
use log::LevelFilter;
use repo_analyst::{
    analyzer::RepoAnalyzer,
    cli,
    error::Result,
    export::{export_report, ExportFormat},
    logging, Config,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository URL to analyze directly (skip interactive mode)
    #[arg(short, long)]
    url: Option<String>,

    /// Also export every report: pdf or markdown
    #[arg(short, long)]
    export: Option<ExportFormat>,

    /// Directory for exported reports (defaults to the configured export dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print which credentials are configured and exit
    #[arg(long)]
    check_env: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn", value_parser = logging::parse_log_level)]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level)?;

    let mut config = Config::load()?;
    if let Some(dir) = cli.output {
        std::fs::create_dir_all(&dir)?;
        config.export_dir = dir;
    }

    if cli.check_env {
        cli::print_env_check(&config);
        return Ok(());
    }

    if let Some(url) = cli.url {
        return run_once(&url, &config, cli.export).await;
    }

    run_interactive(&config, cli.export).await
}

/// Analyzes one URL; failures propagate to the exit code
async fn run_once(url: &str, config: &Config, export: Option<ExportFormat>) -> Result<()> {
    let analyzer = RepoAnalyzer::new(config)?;
    let bundle = analyzer.analyze(url).await?;
    cli::print_report(&bundle);
    if let Some(format) = export {
        let exported = export_report(&bundle, format, &config.export_dir)?;
        cli::print_info(&format!("Exported to {}", exported.path.display()));
    }
    Ok(())
}

/// Reads URLs from stdin until a quit command or EOF
async fn run_interactive(config: &Config, export: Option<ExportFormat>) -> Result<()> {
    let analyzer = RepoAnalyzer::new(config)?;
    cli::print_banner(analyzer.strategy());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nRepository URL ('quit' to exit): ");
        io::stdout().flush()?;

        let input = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if cli::is_quit(input) {
            break;
        }

        println!("Analyzing repository...");
        match analyzer.analyze(input).await {
            Ok(bundle) => {
                cli::print_report(&bundle);
                if let Some(format) = export {
                    match export_report(&bundle, format, &config.export_dir) {
                        Ok(exported) => cli::print_info(&format!("Exported to {}", exported.path.display())),
                        Err(e) => cli::print_error(&format!("Export failed: {}", e)),
                    }
                }
            }
            Err(e) => cli::print_error(&e.to_string()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

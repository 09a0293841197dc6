//! Schema Validator CLI
//!
//! Validates a directory of protocol message schema documents.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use protocol_schemas::{validate_directory, FailurePolicy, SchemaConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Validate protocol message schema documents")]
struct Cli {
    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every schema document under a directory
    Check {
        /// Directory to search for schema documents
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Stop at the first failing document
        #[arg(long)]
        fail_on_first: bool,

        /// Print failing documents only
        #[arg(long)]
        only_failures: bool,
    },

    /// Generate a validation report
    Report {
        /// Directory to search for schema documents
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchemaConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            dir,
            fail_on_first,
            only_failures,
        } => {
            let dir = dir.unwrap_or_else(|| config.schema_dir());
            let policy = if fail_on_first {
                FailurePolicy::FailFast
            } else {
                config.policy()
            };
            let only_failures = only_failures || config.report.only_failures;

            let summary = validate_directory(&dir, &config.schemas.extension, policy)?;

            for outcome in &summary.outcomes {
                match &outcome.result {
                    Ok(_) if only_failures => {}
                    Ok(_) => println!("✅ {}", outcome.path.display()),
                    Err(e) => println!("❌ {} - {}", outcome.path.display(), e),
                }
            }

            println!();
            if summary.is_clean() {
                println!("✅ {} document(s) validated", summary.passed());
            } else {
                println!(
                    "❌ {} of {} document(s) failed",
                    summary.failed(),
                    summary.outcomes.len()
                );
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Report { dir, output } => {
            let dir = dir.unwrap_or_else(|| config.schema_dir());
            let summary =
                validate_directory(&dir, &config.schemas.extension, FailurePolicy::CollectAll)?;

            let failures: Vec<_> = summary
                .failures()
                .map(|outcome| {
                    let error = match &outcome.result {
                        Err(e) => e.to_string(),
                        Ok(_) => String::new(),
                    };
                    serde_json::json!({
                        "file": outcome.path.display().to_string(),
                        "error": error,
                    })
                })
                .collect();

            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "directory": dir.display().to_string(),
                "checked": summary.outcomes.len(),
                "passed": summary.passed(),
                "failed": summary.failed(),
                "failures": failures,
            });

            let report_json = serde_json::to_string_pretty(&report)?;

            if let Some(path) = output {
                std::fs::write(&path, &report_json)?;
                println!("✅ Report written to {:?}", path);
            } else {
                println!("{}", report_json);
            }

            Ok(())
        }
    }
}

mod analysis;
mod apply;
mod commands;
mod config;
mod context;
mod diagnostics;
mod diff;
mod format;
mod output;
mod plan;
mod publish;
mod render;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    ApplyReportCommand, ErrorReportCommand, ErrorReportRequest, PublishTarget, ReportCommand,
    ReportRequest, SummaryCommand,
};
use context::Context;

#[derive(Parser)]
#[command(name = "planlens")]
#[command(about = "Review Terraform and OpenTofu plans as HTML change reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an HTML report from a JSON plan (`terraform show -json`)
    Report {
        /// Path to the JSON plan
        plan: String,

        /// Report name, used for the output file (defaults to the plan file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Title shown in the report
        #[arg(long)]
        display_name: Option<String>,

        /// Report config file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<String>,

        /// Link to the CI build, overrides BUILD_URL and the config file
        #[arg(long)]
        build_url: Option<String>,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Publish to GitHub Pages in this repository (owner/repo)
        #[arg(long)]
        github_pages: Option<String>,

        /// GitHub token used for publishing
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,

        /// Branch GitHub Pages serves from
        #[arg(long, default_value = "gh-pages")]
        github_branch: String,

        /// Folder inside the Pages branch
        #[arg(long)]
        folder: Option<String>,

        /// Build name used in the published URL (defaults to the report name)
        #[arg(long)]
        build_name: Option<String>,
    },

    /// Print a plan summary to the terminal
    Summary {
        /// Path to the JSON plan
        plan: String,

        /// Show sensitive values instead of a placeholder
        #[arg(long)]
        show_sensitive: bool,
    },

    /// Render a diagnostics report from a failed plan
    ErrorReport {
        /// Captured plan output (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Plan error payload, JSON diagnostics or text
        #[arg(long)]
        plan_error: Option<String>,

        /// Report name, used for the output file
        #[arg(short, long)]
        name: Option<String>,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        output_dir: String,
    },

    /// Render a report from apply console output
    ApplyReport {
        /// Path to the captured apply log
        log: String,

        /// Exit code of the apply command
        #[arg(long, allow_negative_numbers = true)]
        exit_code: i32,

        /// Report name, used for the output file
        #[arg(short, long)]
        name: Option<String>,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        output_dir: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::new();

    match cli.command {
        Commands::Report {
            plan,
            name,
            display_name,
            config,
            build_url,
            output_dir,
            github_pages,
            github_token,
            github_branch,
            folder,
            build_name,
        } => {
            let request = ReportRequest {
                plan_path: plan,
                name,
                display_name,
                config_path: config,
                build_url,
                env_build_url: std::env::var(crate::config::BUILD_URL_ENV).ok(),
                output_dir,
                publish: github_pages.map(|repository| PublishTarget {
                    repository,
                    token: github_token,
                    branch: github_branch,
                    folder,
                    build_name,
                }),
            };
            ReportCommand::execute(&ctx, &request)?;
        }
        Commands::Summary {
            plan,
            show_sensitive,
        } => {
            SummaryCommand::execute(&ctx, &plan, show_sensitive)?;
        }
        Commands::ErrorReport {
            input,
            plan_error,
            name,
            output_dir,
        } => {
            let request = ErrorReportRequest {
                input,
                plan_error,
                name,
                output_dir,
            };
            ErrorReportCommand::execute(&ctx, &request)?;
        }
        Commands::ApplyReport {
            log,
            exit_code,
            name,
            output_dir,
        } => {
            ApplyReportCommand::execute(&ctx, &log, exit_code, name.as_deref(), &output_dir)?;
        }
    }

    Ok(())
}

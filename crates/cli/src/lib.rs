//! Command-line front end for toolforge.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod common;
pub mod generate;
pub mod inspect;
pub mod project;
pub mod source;

/// Environment variable holding a log level or a full filter spec.
pub const LOG_ENV: &str = "TOOLFORGE_LOG";

#[derive(Parser)]
#[command(
    name = "toolforge",
    version,
    about = "\x1b[33mtoolforge\x1b[0m turns OpenAPI documents into MCP tools 🔧"
)]
struct Cli {
    /// Log extraction details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 🏗️  Generate an MCP server crate or tool module
    Generate(generate::GenerateArgs),
    /// 🔍 List the tools a document would produce
    Inspect(inspect::InspectArgs),
}

/// Entry point used by the `toolforge` binary. Returns the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            match cli.command {
                Some(Commands::Generate(args)) => generate::run(args).await,
                Some(Commands::Inspect(args)) => inspect::run(args).await,
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = log_filter(std::env::var(LOG_ENV).ok().as_deref(), verbose);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Build the filter spec. A bare level applies to every `toolforge*` target;
/// anything else is passed through as a full spec.
fn log_filter(env: Option<&str>, verbose: bool) -> String {
    match env {
        Some(level) if is_plain_level(level) => {
            format!("toolforge={}", level.to_ascii_lowercase())
        }
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ if verbose => "toolforge=debug".to_string(),
        _ => "toolforge=warn".to_string(),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

use clap::Args;
use console::style;
use std::path::PathBuf;
use tracing::debug;

use toolforge_core::openapi::ir::EmitOptions;
use toolforge_core::{GenerateOptions, generate};

use crate::common::{print_diagnostics, run_cli_async};
use crate::project::{ProjectMeta, write_module, write_project};
use crate::source::SpecSource;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "SOURCE",
        help = "Path or http(s) URL of the OpenAPI document"
    )]
    pub source: String,
    #[arg(
        long,
        short = 'n',
        help = "Namespace of the generated module and tool container"
    )]
    pub name: String,
    #[arg(
        long = "base-url",
        value_name = "URL",
        help = "Absolute base URL the tools call. A placeholder is emitted when omitted"
    )]
    pub base_url: Option<String>,
    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        help = "Output directory, or the module file with --module-only"
    )]
    pub output: Option<PathBuf>,
    #[arg(
        long = "module-only",
        help = "Write only the tool module instead of a server crate"
    )]
    pub module_only: bool,
    #[arg(long, help = "Overwrite existing output")]
    pub force: bool,
}

pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let options =
        GenerateOptions::new(&args.name, args.base_url.as_deref()).map_err(|err| err.to_string())?;

    let source = SpecSource::parse(&args.source);
    let text = source.acquire().await.map_err(|err| err.to_string())?;
    debug!(%source, bytes = text.len(), "Acquired OpenAPI document.");

    let generated = generate(&text, &options).map_err(|err| format!("{source}: {err}"))?;
    print_diagnostics(&generated.diagnostics);

    let target = if args.module_only {
        let file = args.output.unwrap_or_else(|| PathBuf::from("tools.rs"));
        write_module(&file, &generated.code, args.force).map_err(|err| err.to_string())?
    } else {
        let dir = args
            .output
            .unwrap_or_else(|| PathBuf::from(default_project_dir(&options)));
        let meta = ProjectMeta {
            namespace: options.namespace().to_string(),
            base_url: options.base_url().map(String::from),
            source: source.to_string(),
        };
        write_project(&dir, &generated, &meta, args.force).map_err(|err| err.to_string())?;
        dir
    };

    println!(
        "{} Generated {} tool(s) into {}",
        style("✓").green().bold(),
        style(generated.endpoints.len()).cyan(),
        style(target.display()).bold()
    );
    if options.base_url().is_none() {
        println!(
            "{} No --base-url given, the tools call http://localhost:8080",
            style("!").yellow().bold()
        );
    }
    Ok(())
}

/// `./<module name>` for the namespace.
fn default_project_dir(options: &GenerateOptions) -> String {
    EmitOptions {
        namespace: options.namespace().to_string(),
        base_url: None,
    }
    .module_name()
}

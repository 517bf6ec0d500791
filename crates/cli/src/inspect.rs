use clap::Args;
use console::style;

use toolforge_core::openapi::ir::extract_endpoints;
use toolforge_core::{Endpoint, OpenApiSpec};

use crate::common::{print_diagnostics, run_cli_async};
use crate::source::SpecSource;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(
        value_name = "SOURCE",
        help = "Path or http(s) URL of the OpenAPI document"
    )]
    pub source: String,
}

pub async fn run(args: InspectArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: InspectArgs) -> Result<(), String> {
    let source = SpecSource::parse(&args.source);
    let text = source.acquire().await.map_err(|err| err.to_string())?;

    let spec = OpenApiSpec::parse(&text).map_err(|err| format!("{source}: {err}"))?;
    let extraction = extract_endpoints(&spec).map_err(|err| format!("{source}: {err}"))?;

    for endpoint in &extraction.endpoints {
        println!("{}", endpoint_line(endpoint));
    }
    println!(
        "\n{} endpoint(s) in {}",
        style(extraction.endpoints.len()).cyan().bold(),
        style(&source).dim()
    );
    print_diagnostics(&extraction.diagnostics);
    Ok(())
}

/// `METHOD path -> ToolName`, unstyled.
fn endpoint_line(endpoint: &Endpoint) -> String {
    format!(
        "{:<7} {} -> {}",
        endpoint.http_method.as_str(),
        endpoint.path,
        endpoint.tool_name
    )
}

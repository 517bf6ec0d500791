//! Helpers shared by the CLI commands.

use console::style;
use toolforge_core::Diagnostic;

/// Run a command body and turn its error into exit code 1.
pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            1
        }
    }
}

/// Print extraction diagnostics to stderr.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!(
        "{}",
        style(format!("{} diagnostic(s):", diagnostics.len())).yellow().bold()
    );
    for diagnostic in diagnostics {
        eprintln!("  {} {diagnostic}", style("-").yellow());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_cli_async_exit_codes() {
        assert_eq!(run_cli_async(|| async { Ok(()) }).await, 0);
        assert_eq!(run_cli_async(|| async { Err("boom".to_string()) }).await, 1);
    }
}

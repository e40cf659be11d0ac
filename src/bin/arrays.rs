use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use string_array::cli::Cli;
use string_array::{DEMO_SCRIPT, Session};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(cli.log_level().into()))
        .with_writer(io::stderr)
        .init();

    if cli.demo {
        run_source(DEMO_SCRIPT).context("Demonstration script failed")?;
    } else if let Some(file_path) = cli.file {
        run_script(&file_path).with_context(|| format!("Failed to run script: {:?}", file_path))?;
    } else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
    }

    Ok(())
}

fn run_script(path: &Path) -> Result<()> {
    // 1. Verify file existence and extension
    if !path.exists() {
        return Err(anyhow!("File not found: {:?}", path));
    }
    if path.extension().and_then(|s| s.to_str()) != Some("arr") {
        return Err(anyhow!("File must have .arr extension: {:?}", path));
    }

    // 2. Read the script
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    // 3. Run it
    run_source(&source)
}

fn run_source(source: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut session = Session::new(stdout.lock());
    session.run(source)?;
    session.into_output().flush()?;
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arrays")]
#[command(version, about = "Drive owning string arrays from a command script", long_about = None)]
pub struct Cli {
    /// The .arr script file to run
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Run the built-in demonstration script
    #[arg(short, long)]
    pub demo: bool,

    /// Set verbose level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log directive for this verbosity, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

mod check;
mod resolve;

pub use check::*;
use clap::Subcommand;
pub use resolve::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate configuration and exit
    Check {
        /// Path to config directory
        #[arg(default_value = "config")]
        path: PathBuf,

        /// Print errors without diagnostics formatting
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Resolve request-targets against the compliance policy
    Resolve {
        /// Request-targets as they would appear on the request line
        #[arg(required = true)]
        targets: Vec<String>,

        /// Path to config directory (policy, bypass flag)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Policy string overriding the config, e.g. "LEGACY,-AMBIGUOUS_PATH_ENCODING"
        #[arg(long)]
        policy: Option<String>,

        /// Output one JSON object per target
        #[arg(long)]
        json: bool,
    },
}

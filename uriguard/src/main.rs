use clap::Parser;
use uriguard_core::cli::{self, Command};
use uriguard_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "uriguard",
    version,
    about = "uriguard: request-target compliance and canonical path decoding"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    match cli.command {
        Command::Check { path, plain } => {
            if let Err(e) = cli::check(path, plain) {
                eprintln!("config error: {e}");
                std::process::exit(1);
            }
        }

        Command::Resolve {
            targets,
            config,
            policy,
            json,
        } => match cli::resolve(&targets, config, policy, json) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("resolve error: {e:#}");
                std::process::exit(2);
            }
        },
    }
}

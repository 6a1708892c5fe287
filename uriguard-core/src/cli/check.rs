use crate::conf::{ConfigError, load_config};
use miette::Report;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("{} Config loaded successfully", "✔".green());
            println!("{} policy {}", "✔".green(), cfg.policy());
            println!("{} {} routes", "✔".green(), cfg.spec.routes.len());
            if cfg.bypass().is_enabled() {
                println!(
                    "{} ambiguous URI checks are bypassed (bypass_ambiguity_checks = true)",
                    "!".yellow()
                );
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: ConfigError, plain: bool) {
    let hints = collect_hints(&err);
    if plain {
        eprintln!("{}", err);
        if let ConfigError::Validation { validation_errors } = &err {
            for e in validation_errors {
                eprintln!("  - {}", e);
            }
        }
    } else {
        eprintln!();
        eprintln!("{:?}", Report::new(err));
    }
    for hint in hints {
        eprintln!();
        eprintln!("{}", hint);
    }
}

fn collect_hints(err: &ConfigError) -> Vec<&'static str> {
    let mut hints = match err {
        ConfigError::Validation { validation_errors } => validation_errors
            .iter()
            .filter_map(config_error_hint)
            .collect::<Vec<_>>(),
        other => config_error_hint(other).into_iter().collect(),
    };
    hints.dedup();
    hints
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Compliance errors
        //---------------------------------------------------------------------
        ConfigError::UnknownPolicy { .. } => Some(
            "Known policies are DEFAULT, LEGACY and UNSAFE.\n\
             \n\
             Example:\n\
             \n\
             compliance {\n\
             \x20 policy = \"DEFAULT\"\n\
             }",
        ),

        ConfigError::UnknownViolation { .. } => Some(
            "Tolerated kinds must be one of:\n\
             \n\
             AMBIGUOUS_PATH_SEPARATOR, AMBIGUOUS_PATH_ENCODING, AMBIGUOUS_EMPTY_SEGMENT,\n\
             AMBIGUOUS_PATH_PARAMETER, AMBIGUOUS_PATH_SEGMENT",
        ),

        //---------------------------------------------------------------------
        // Route errors
        //---------------------------------------------------------------------
        ConfigError::InvalidRoutePath { .. } => Some(
            "Route paths are matched against decoded path segments.\n\
             \n\
             Example:\n\
             \n\
             routes = [\n\
             \x20 { path = \"/api\", target = \"api\" },\n\
             ]",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}

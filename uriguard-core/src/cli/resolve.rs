use crate::conf::load_config;
use crate::uri::{
    BypassFlag, CompliancePolicy, DecodedPath, RawTarget, UriComplianceEngine, ViolationSet,
    bypass,
};
use anyhow::Context;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub target: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Accepted {
        canonical: String,
        segments: Vec<String>,
        bypassed: bool,
    },
    Rejected {
        reason: String,
        violations: ViolationSet,
    },
    Invalid {
        error: String,
    },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }
}

/// Resolve each target and print the outcome. Returns `false` if any target
/// would not be routed.
pub fn resolve(
    targets: &[String],
    config: Option<PathBuf>,
    policy: Option<String>,
    json: bool,
) -> anyhow::Result<bool> {
    let (policy, bypass_flag) = startup_settings(config, policy)?;
    bypass::install(bypass_flag)?;

    let engine = UriComplianceEngine::new(policy);
    let bypass_flag = bypass::installed();

    let mut all_accepted = true;
    for target in targets {
        let report = report_target(&engine, bypass_flag, target);
        all_accepted &= report.outcome.is_accepted();

        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_pretty(&report);
        }
    }

    Ok(all_accepted)
}

fn startup_settings(
    config: Option<PathBuf>,
    policy: Option<String>,
) -> anyhow::Result<(CompliancePolicy, BypassFlag)> {
    let cfg = config
        .map(|path| {
            load_config(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        })
        .transpose()?;

    let bypass_flag = cfg.as_ref().map(|c| c.bypass()).unwrap_or_default();

    let policy = match (policy, cfg) {
        (Some(spec), _) => CompliancePolicy::parse(&spec)?,
        (None, Some(cfg)) => cfg.policy().clone(),
        (None, None) => CompliancePolicy::DEFAULT,
    };

    Ok((policy, bypass_flag))
}

pub fn report_target(
    engine: &UriComplianceEngine,
    bypass_flag: BypassFlag,
    target: &str,
) -> TargetReport {
    let outcome = match RawTarget::parse(target) {
        Err(err) => Outcome::Invalid {
            error: err.to_string(),
        },
        Ok(raw) => match engine.route_path(&raw, bypass_flag) {
            Ok((canonical, bypassed)) => accepted(&canonical, bypassed),
            Err(rejection) => Outcome::Rejected {
                reason: rejection.to_string(),
                violations: rejection.violations(),
            },
        },
    };

    TargetReport {
        target: target.to_string(),
        outcome,
    }
}

fn accepted(canonical: &DecodedPath, bypassed: bool) -> Outcome {
    Outcome::Accepted {
        canonical: canonical.to_encoded_string(),
        segments: canonical.segments().to_vec(),
        bypassed,
    }
}

fn print_pretty(report: &TargetReport) {
    match &report.outcome {
        Outcome::Accepted {
            canonical,
            segments,
            bypassed,
        } => {
            let marker = if *bypassed {
                "!".yellow().to_string()
            } else {
                "✔".green().to_string()
            };
            println!(
                "{} {} -> {} {:?}{}",
                marker,
                report.target,
                canonical.bold(),
                segments,
                if *bypassed { " (bypassed)" } else { "" }
            );
        }
        Outcome::Rejected { reason, .. } => {
            println!("{} {} 400 ({})", "✘".red(), report.target, reason);
        }
        Outcome::Invalid { error } => {
            println!("{} {} 400 ({})", "✘".red(), report.target, error);
        }
    }
}

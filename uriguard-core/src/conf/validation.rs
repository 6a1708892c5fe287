use crate::conf::error::ConfigError;
use crate::conf::types::{ComplianceSpec, ConfigSpec, RouteSpec, ServerSpec};
use crate::uri::{CompliancePolicy, ViolationKind};
use std::collections::HashSet;

#[derive(Default)]
pub struct ValidationCtx {
    errors: Vec<ConfigError>,
}

impl ValidationCtx {
    pub fn push(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation {
                validation_errors: self.errors,
            })
        }
    }
}

/// Validate the whole config, collecting every semantic error.
pub fn validate_config(spec: &ConfigSpec) -> Result<(), ConfigError> {
    let mut ctx = ValidationCtx::default();

    validate_server(&spec.server, &mut ctx);
    validate_compliance(&spec.compliance, &mut ctx);
    validate_routes(&spec.routes, &mut ctx);

    ctx.into_result()
}

fn validate_server(server: &ServerSpec, ctx: &mut ValidationCtx) {
    if server.version != 1 {
        ctx.push(ConfigError::InvalidVersion {
            version: server.version,
        });
    }
}

fn validate_compliance(compliance: &ComplianceSpec, ctx: &mut ValidationCtx) {
    if CompliancePolicy::preset(&compliance.policy).is_err() {
        ctx.push(ConfigError::UnknownPolicy {
            name: compliance.policy.clone(),
        });
    }

    for name in &compliance.tolerate {
        if name.parse::<ViolationKind>().is_err() {
            ctx.push(ConfigError::UnknownViolation { name: name.clone() });
        }
    }
}

fn validate_routes(routes: &[RouteSpec], ctx: &mut ValidationCtx) {
    let mut seen = HashSet::new();

    for route in routes {
        if !route.path.starts_with('/') {
            ctx.push(ConfigError::InvalidRoutePath {
                path: route.path.clone(),
                reason: "must start with '/'".to_string(),
            });
            continue;
        }

        if route.path.contains('%') {
            ctx.push(ConfigError::InvalidRoutePath {
                path: route.path.clone(),
                reason: "route paths match decoded segments and must not contain escapes"
                    .to_string(),
            });
        }

        let key = route.path.trim_end_matches('/').to_string();
        if !seen.insert(key) {
            ctx.push(ConfigError::DuplicateRoute {
                path: route.path.clone(),
            });
        }
    }
}

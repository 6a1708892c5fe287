use crate::uri::{BypassFlag, DecodedPath, RawTarget, UriComplianceEngine};
use anyhow::{Result, anyhow};
use http::StatusCode;

/// Routes request-targets by their canonical path.
///
/// Every target goes through the [`UriComplianceEngine`] first; the raw
/// target is never used for matching.
#[derive(Debug)]
pub struct Router {
    engine: UriComplianceEngine,
    bypass: BypassFlag,
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub target: String,
    segments: Vec<String>,
}

#[derive(Debug)]
pub enum Dispatch<'a> {
    Matched {
        route: &'a RouteEntry,
        raw: RawTarget,
        canonical: DecodedPath,
        /// Routed only because the ambiguity checks were bypassed.
        bypassed: bool,
    },
    /// Deliberately carries no detail about the path or the rule that fired.
    BadRequest,
    NotFound,
}

impl Dispatch<'_> {
    pub fn status(&self) -> StatusCode {
        match self {
            Dispatch::Matched { .. } => StatusCode::OK,
            Dispatch::BadRequest => StatusCode::BAD_REQUEST,
            Dispatch::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl Router {
    pub fn new(engine: UriComplianceEngine, bypass: BypassFlag) -> Self {
        Self {
            engine,
            bypass,
            routes: Vec::new(),
        }
    }

    pub fn engine(&self) -> &UriComplianceEngine {
        &self.engine
    }

    pub fn add_route(&mut self, path: &str, target: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(anyhow!("route path must start with '/': {}", path));
        }

        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if self.routes.iter().any(|r| r.segments == segments) {
            return Err(anyhow!("duplicate route path: {}", path));
        }

        self.routes.push(RouteEntry {
            path: path.to_string(),
            target: target.to_string(),
            segments,
        });

        // The longest prefix wins --> sort descending by segment count.
        self.routes
            .sort_by(|a, b| b.segments.len().cmp(&a.segments.len()));

        Ok(())
    }

    pub fn dispatch(&self, request_target: &str) -> Dispatch<'_> {
        let Ok(raw) = RawTarget::parse(request_target) else {
            return Dispatch::BadRequest;
        };

        let Ok((canonical, bypassed)) = self.engine.route_path(&raw, self.bypass) else {
            return Dispatch::BadRequest;
        };

        match self.match_route(&canonical) {
            Some(route) => Dispatch::Matched {
                route,
                raw,
                canonical,
                bypassed,
            },
            None => Dispatch::NotFound,
        }
    }

    pub fn match_route(&self, path: &DecodedPath) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .find(|route| segments_match(&route.segments, path.segments()))
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

/// Segment-wise prefix match, so `/api` matches `/api/x` but not `/apix`, and
/// a decoded `%2F` inside a segment never lines up with a route separator.
fn segments_match(route: &[String], request: &[String]) -> bool {
    route.len() <= request.len() && route.iter().zip(request).all(|(r, q)| r == q)
}

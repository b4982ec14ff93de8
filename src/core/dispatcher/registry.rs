//! Route table mapping `(method, path pattern)` to handlers

use super::handler::Handler;
use crate::core::batch::HttpMethod;
use crate::core::batch::validation::API_PREFIX;
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern such as `/api/users/{id}/orders`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if !pattern.starts_with(API_PREFIX) {
            return Err(GatewayError::config(format!(
                "Route pattern '{}' must start with {}",
                pattern, API_PREFIX
            )));
        }
        if pattern.contains('?') {
            return Err(GatewayError::config(format!(
                "Route pattern '{}' must not contain a query string",
                pattern
            )));
        }

        let mut segments = Vec::new();
        let mut names = Vec::new();
        for part in split_segments(pattern) {
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() || names.contains(&name) {
                    return Err(GatewayError::config(format!(
                        "Route pattern '{}' has an empty or repeated parameter",
                        pattern
                    )));
                }
                names.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a bare path, returning captured parameters
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    captured.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(captured)
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Two patterns overlap structurally when they differ only in parameter names
    fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| match (a, b) {
                    (Segment::Literal(x), Segment::Literal(y)) => x == y,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

struct Route {
    method: HttpMethod,
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
}

/// Result of resolving a sub-request against the registry
pub enum RouteMatch {
    Found {
        handler: Arc<dyn Handler>,
        path_params: HashMap<String, String>,
    },
    /// The path exists but not for this method
    MethodNotAllowed,
    NotFound,
}

/// Registered handlers
#[derive(Default)]
pub struct HandlerRegistry {
    routes: Vec<Route>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` on `pattern`
    pub fn register<H>(&mut self, method: HttpMethod, pattern: &str, handler: H) -> Result<&mut Self>
    where
        H: Handler + 'static,
    {
        self.register_arc(method, pattern, Arc::new(handler))
    }

    pub fn register_arc(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self> {
        let pattern = PathPattern::parse(pattern)?;
        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.pattern.same_shape(&pattern))
        {
            return Err(GatewayError::config(format!(
                "Route {} {} is already registered",
                method, pattern
            )));
        }

        debug!("Registered route {} {}", method, pattern);
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    /// Resolve a bare path (no query string).
    ///
    /// When several patterns match, the one with the most literal segments wins.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> RouteMatch {
        let mut best: Option<(&Route, HashMap<String, String>)> = None;
        let mut path_known = false;

        for route in &self.routes {
            let Some(captured) = route.pattern.matches(path) else {
                continue;
            };
            path_known = true;
            if route.method != method {
                continue;
            }
            let better = best
                .as_ref()
                .map(|(current, _)| route.pattern.literal_count() > current.pattern.literal_count())
                .unwrap_or(true);
            if better {
                best = Some((route, captured));
            }
        }

        match best {
            Some((route, path_params)) => RouteMatch::Found {
                handler: Arc::clone(&route.handler),
                path_params,
            },
            None if path_known => RouteMatch::MethodNotAllowed,
            None => RouteMatch::NotFound,
        }
    }

    /// Cache TTL declared by the handler a GET on `path` would reach
    pub fn cache_ttl(&self, method: HttpMethod, path: &str) -> Option<std::time::Duration> {
        if !method.is_get() {
            return None;
        }
        match self.resolve(method, path) {
            RouteMatch::Found { handler, .. } => handler.cache_ttl(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered routes as `(method, pattern)` pairs
    pub fn routes(&self) -> impl Iterator<Item = (HttpMethod, &str)> {
        self.routes.iter().map(|r| (r.method, r.pattern.as_str()))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| format!("{} {}", r.method, r.pattern)))
            .finish()
    }
}

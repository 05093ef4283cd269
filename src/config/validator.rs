//! Route table validation. Resource and field names end up in URLs and SQL identifiers, so they
//! must be plain identifiers.

use crate::config::PageRoute;
use crate::error::ConfigError;
use crate::routes::ENTRIES_SUFFIX;
use regex::Regex;
use std::collections::HashSet;

const IDENT_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const SEGMENT_PATTERN: &str = r"^[A-Za-z0-9_.~-]+$";

fn invalid(route: &PageRoute, reason: String) -> ConfigError {
    ConfigError::InvalidRoute {
        path: route.path.clone(),
        reason,
    }
}

fn pattern(p: &str) -> Result<Regex, ConfigError> {
    Regex::new(p).map_err(|e| ConfigError::InvalidRoute {
        path: String::new(),
        reason: format!("pattern {}: {}", p, e),
    })
}

/// Check a path made of `/segment` parts. Empty is allowed only when `allow_empty` (base path).
pub fn validate_path(path: &str, allow_empty: bool) -> Result<(), String> {
    if path.is_empty() {
        return if allow_empty {
            Ok(())
        } else {
            Err("path is empty".into())
        };
    }
    let segment = Regex::new(SEGMENT_PATTERN).map_err(|e| e.to_string())?;
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| "path must start with '/'".to_string())?;
    for part in rest.split('/') {
        if part.is_empty() {
            return Err("path has an empty segment or trailing slash".into());
        }
        if !segment.is_match(part) {
            return Err(format!("invalid path segment '{}'", part));
        }
    }
    Ok(())
}

pub fn validate_routes(routes: &[PageRoute]) -> Result<(), ConfigError> {
    if routes.is_empty() {
        return Err(ConfigError::InvalidRoute {
            path: String::new(),
            reason: "at least one route required".into(),
        });
    }
    let ident = pattern(IDENT_PATTERN)?;

    let mut paths = HashSet::new();
    for route in routes {
        validate_path(&route.path, false).map_err(|reason| invalid(route, reason))?;
        if !paths.insert(route.path.as_str()) {
            return Err(ConfigError::DuplicatePath(route.path.clone()));
        }
        if !ident.is_match(&route.resource) {
            return Err(invalid(route, format!("invalid resource name '{}'", route.resource)));
        }
        if !ident.is_match(route.data_key()) {
            return Err(invalid(route, format!("invalid data key '{}'", route.data_key())));
        }
        if let Some(detail) = &route.detail {
            if !ident.is_match(&detail.key_field) {
                return Err(invalid(route, format!("invalid key field '{}'", detail.key_field)));
            }
            if !ident.is_match(detail.data_key()) {
                return Err(invalid(route, format!("invalid detail data key '{}'", detail.data_key())));
            }
            if let Some(entries) = &detail.entries {
                if entries.iter().any(|e| e.is_empty()) {
                    return Err(invalid(route, "entries must not contain empty slugs".into()));
                }
            }
        }
    }

    // Detail pages live at `{path}/{slug}`, the entries listing at `{path}.entries`.
    for route in routes.iter().filter(|r| r.detail.is_some()) {
        let prefix = format!("{}/", route.path);
        let shadowed = routes
            .iter()
            .find(|r| r.path.strip_prefix(&prefix).is_some_and(|rest| !rest.contains('/')));
        if let Some(other) = shadowed {
            return Err(invalid(
                other,
                format!("collides with detail pages of {}", route.path),
            ));
        }
        let listing = format!("{}{}", route.path, ENTRIES_SUFFIX);
        if let Some(other) = routes.iter().find(|r| r.path == listing) {
            return Err(invalid(
                other,
                format!("collides with the entries listing of {}", route.path),
            ));
        }
    }
    Ok(())
}

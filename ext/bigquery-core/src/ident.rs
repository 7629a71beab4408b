//! Qualified identifiers and API naming helpers.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BigQueryError, Result};

fn project_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<project_id>\S+:[^.]+)\.(?P<dataset_id>[^.]+)(?:$|\.(?P<custom_id>[^.]+)$)",
        )
        .expect("project prefix pattern is valid")
    })
}

/// Split a fully-qualified standard SQL id into its parts.
///
/// Project ids carrying a domain prefix (`example.com:proj`) are kept whole.
pub fn split_id(full_id: &str) -> Vec<String> {
    match project_prefix_pattern().captures(full_id) {
        Some(caps) => ["project_id", "dataset_id", "custom_id"]
            .iter()
            .filter_map(|name| caps.name(name))
            .map(|m| m.as_str())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        None => full_id.split('.').map(str::to_string).collect(),
    }
}

/// Parse `project.dataset.resource` (or `dataset.resource` with a default
/// project) into its three parts.
pub fn parse_three_part_id(
    full_id: &str,
    default_project: Option<&str>,
    property_name: &str,
) -> Result<(String, String, String)> {
    let mut parts = split_id(full_id);

    if parts.len() != 2 && parts.len() != 3 {
        return Err(BigQueryError::format(format!(
            "{property_name} must be a fully-qualified ID in standard SQL format, \
             e.g., \"project.dataset.{property_name}\", got {full_id}"
        )));
    }

    let default_project = default_project.filter(|p| !p.is_empty());
    if parts.len() == 2 {
        let Some(project) = default_project else {
            return Err(BigQueryError::format(format!(
                "When default_project is not set, {property_name} must be a fully-qualified \
                 ID in standard SQL format, e.g., \"project.dataset_id.{property_name}\", \
                 got {full_id}"
            )));
        };
        parts.insert(0, project.to_string());
    }

    let resource = parts.pop().unwrap_or_default();
    let dataset = parts.pop().unwrap_or_default();
    let project = parts.pop().unwrap_or_default();
    Ok((project, dataset, resource))
}

/// Convert `snake_case` to `camelCase`
pub fn snake_to_camel_case(value: &str) -> String {
    let mut words = value.split('_');
    let mut out = words.next().unwrap_or_default().to_string();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

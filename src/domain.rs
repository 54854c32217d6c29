use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Anti-XSSI guard that Google prepends to some JSON responses.
pub const JSONP_PREFIX: &str = ")]}'\n";

pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_domains(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read domain list from {:?}", path))?;
    Ok(parse_domain_list(&content))
}

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.starts_with("application/json")
}

pub fn strip_jsonp_prefix(body: &str) -> &str {
    body.strip_prefix(JSONP_PREFIX).unwrap_or(body)
}

pub fn parse_payload(body: &str) -> serde_json::Result<Value> {
    serde_json::from_str(strip_jsonp_prefix(body))
}

/// Loose danger heuristic: any `true` token anywhere in the re-serialized payload.
///
/// Unrelated boolean fields trip it too, and so do string values spelling
/// "true" in any case.
pub fn looks_dangerous(payload: &Value) -> serde_json::Result<bool> {
    let serialized = serde_json::to_string(payload)?;
    Ok(serialized.to_lowercase().contains("true"))
}

//! Parsing helpers for the downward API `annotations` file.
//!
//! Each line is `key="value"` where the value is a quoted string with
//! backslash escapes, e.g.
//! `k8s.v1.cni.cncf.io/network-status="[{\n    \"name\": \"cbr0\"}]"`.

use crate::{HalError, HalResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn read_annotations(path: &Path) -> HalResult<HashMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|source| HalError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_annotations(&content))
}

/// Parses annotation lines into a map. Lines without `=` are skipped.
pub fn parse_annotations(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let (key, raw) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(raw.trim())))
        })
        .collect()
}

fn unquote(raw: &str) -> String {
    let inner = match raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

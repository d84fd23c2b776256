//! odk-config
//!
//! Layered YAML configuration for order entry.
//!
//! Documents are merged in order (later documents override earlier ones,
//! objects merge key by key), converted to JSON, serialized compactly and
//! hashed with SHA-256 so a session can record exactly which settings it ran
//! with.
//!
//! Recognized keys:
//!
//! | Pointer           | Meaning                                  | Default   |
//! |-------------------|------------------------------------------|-----------|
//! | `/quantity/min`   | floor for every quantity field           | 0         |
//! | `/quantity/max`   | ceiling; absent or `null` means none     | unbounded |
//! | `/logging/filter` | tracing `EnvFilter` directive            | `info`    |

use anyhow::{bail, Context, Result};
use odk_quantity::{Bounds, Qty};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Every pointer the code reads. A leaf under one of these is consumed.
pub const CONSUMED_POINTERS: &[&str] = &["/quantity/min", "/quantity/max", "/logging/filter"];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    pub fn field_defaults(&self) -> Result<FieldDefaults> {
        FieldDefaults::from_config_json(&self.config_json)
    }

    pub fn log_filter(&self) -> Result<String> {
        log_filter_from_config_json(&self.config_json)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        if raw.trim().is_empty() {
            continue;
        }
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

// ---------------------------------------------------------------------------
// Input documents
// ---------------------------------------------------------------------------

/// Load a typed YAML or JSON document (line items, session scripts). A UTF-8
/// BOM is stripped. `what` names the document in error messages.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>, what: &str) -> Result<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("read {what} failed: {}", path.display()))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = std::str::from_utf8(bytes).with_context(|| format!("{what} must be UTF-8 text"))?;
    parse_document(raw, what)
}

/// JSON input is routed to serde_json for its error messages; anything else
/// is parsed as YAML.
pub fn parse_document<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    if raw.trim_start().starts_with(['[', '{']) {
        return serde_json::from_str(raw).with_context(|| format!("{what} must contain valid JSON"));
    }
    serde_yaml::from_str(raw).with_context(|| format!("{what} must contain valid YAML"))
}

// ---------------------------------------------------------------------------
// Typed extraction
// ---------------------------------------------------------------------------

/// Basket-wide quantity bounds, before per-line stock narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldDefaults {
    pub bounds: Bounds,
}

impl FieldDefaults {
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        let min = read_qty(config_json, "/quantity/min")?.unwrap_or(0);
        let max = read_qty(config_json, "/quantity/max")?;
        let bounds = Bounds::new(min, max).context("CONFIG_INVALID /quantity")?;
        Ok(Self { bounds })
    }
}

pub fn log_filter_from_config_json(config_json: &Value) -> Result<String> {
    match config_json.pointer("/logging/filter") {
        None | Some(Value::Null) => Ok(DEFAULT_LOG_FILTER.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(other) => bail!("CONFIG_INVALID /logging/filter: expected non-empty string, got {other}"),
    }
}

fn read_qty(config_json: &Value, ptr: &str) -> Result<Option<Qty>> {
    match config_json.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let n = v
                .as_u64()
                .with_context(|| format!("CONFIG_INVALID {ptr}: expected non-negative integer, got {v}"))?;
            let q = Qty::try_from(n)
                .with_context(|| format!("CONFIG_INVALID {ptr}: {n} is too large"))?;
            Ok(Some(q))
        }
    }
}

// ---------------------------------------------------------------------------
// Unused-key guard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report config leaves that nothing reads. Typos such as `/quantity/maxx`
/// would otherwise be silently ignored.
///
/// `Warn` logs and returns the report; `Fail` errors with `CONFIG_UNUSED_KEYS`.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = CONSUMED_POINTERS
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if !report.is_clean() {
        match policy {
            UnusedKeyPolicy::Fail => bail!(
                "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. \
                Remove them or update the consumed registry. First few: {}",
                report.unused_leaf_pointers.len(),
                preview_list(&report.unused_leaf_pointers, 12)
            ),
            UnusedKeyPolicy::Warn => tracing::warn!(
                count = report.unused_leaf_pointers.len(),
                keys = %preview_list(&report.unused_leaf_pointers, 12),
                "unused config keys"
            ),
        }
    }

    Ok(report)
}

/// Normalize JSON pointer: leading "/" and no trailing "/" (except root).
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// "/a/b" consumes "/a/b" and "/a/b/c" but NOT "/a/bc". "/" consumes everything.
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        // An empty document root has no leaves.
        _ if prefix.is_empty() => {}
        _ => out.push(prefix.to_string()),
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).cloned().collect::<Vec<_>>();
    format!("{:?}", take)
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(&sort_keys(v)).context("canonical json serialize failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                out.insert(k.clone(), sort_keys(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

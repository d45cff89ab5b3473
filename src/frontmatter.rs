//! Front matter parsing for project content files.
//!
//! Two block styles are recognized at the very top of a file:
//!
//! - `---` fenced YAML-style metadata. Only the flat subset used by content
//!   files is supported: `key: value` scalars (quoted or bare strings,
//!   booleans, numbers), inline lists (`tags: [web, "red team"]`) and block
//!   lists (`- item` lines under an empty `key:`).
//! - `+++` fenced TOML, parsed with the `toml` crate.
//!
//! Both produce a JSON object so the loader can deserialize one typed
//! struct regardless of the source format. A file without a fence has empty
//! metadata and the whole text as body.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Metadata block and the remaining body text of a content file.
#[derive(Debug, Clone, Default)]
pub struct FrontMatterDoc {
    pub data: Map<String, Value>,
    pub body: String,
}

pub fn parse(text: &str) -> Result<FrontMatterDoc> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.lines();
    let fence = match lines.next().map(str::trim_end) {
        Some("---") => "---",
        Some("+++") => "+++",
        _ => {
            return Ok(FrontMatterDoc {
                data: Map::new(),
                body: text.to_string(),
            })
        }
    };

    let mut block = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == fence {
            closed = true;
            break;
        }
        block.push(line);
    }
    if !closed {
        bail!("unterminated front matter: missing closing '{}'", fence);
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    let body = body.trim_start_matches('\n').to_string();

    let data = if fence == "+++" {
        parse_toml_block(&block.join("\n"))?
    } else {
        parse_yaml_block(&block)?
    };

    Ok(FrontMatterDoc { data, body })
}

fn parse_toml_block(block: &str) -> Result<Map<String, Value>> {
    let table: toml::Table = toml::from_str(block).context("invalid TOML front matter")?;
    match serde_json::to_value(table)? {
        Value::Object(map) => Ok(map),
        _ => bail!("TOML front matter is not a table"),
    }
}

fn parse_yaml_block(lines: &[&str]) -> Result<Map<String, Value>> {
    let mut data = Map::new();
    let mut open_list: Option<String> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 2;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix("- ").or(if trimmed == "-" {
            Some("")
        } else {
            None
        }) {
            let Some(key) = open_list.as_ref() else {
                bail!("line {}: list item without a key", line_no);
            };
            if let Some(Value::Array(items)) = data.get_mut(key) {
                items.push(parse_scalar(item.trim()));
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            bail!("line {}: expected 'key: value', got '{}'", line_no, trimmed);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("line {}: empty key", line_no);
        }
        let value = value.trim();

        if value.is_empty() {
            data.insert(key.to_string(), Value::Array(Vec::new()));
            open_list = Some(key.to_string());
            continue;
        }

        open_list = None;
        let parsed = if value.starts_with('[') {
            let inner = value
                .strip_prefix('[')
                .and_then(|v| v.strip_suffix(']'))
                .with_context(|| format!("line {}: unterminated inline list", line_no))?;
            Value::Array(split_list(inner).iter().map(|s| parse_scalar(s)).collect())
        } else {
            parse_scalar(value)
        };
        data.insert(key.to_string(), parsed);
    }

    Ok(data)
}

/// Splits an inline list body on commas that are not inside quotes.
fn split_list(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match (c, quote) {
            ('"' | '\'', None) => {
                quote = Some(c);
                current.push(c);
            }
            (c, Some(q)) if c == q => {
                quote = None;
                current.push(c);
            }
            (',', None) => {
                items.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items.retain(|s| !s.is_empty());
    items
}

fn parse_scalar(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.len() >= 2 {
        let quoted = (raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\''));
        if quoted {
            return Value::String(raw[1..raw.len() - 1].to_string());
        }
    }

    match raw {
        "true" | "yes" => return Value::Bool(true),
        "false" | "no" => return Value::Bool(false),
        "null" | "~" | "" => return Value::Null,
        _ => {}
    }

    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }

    Value::String(raw.to_string())
}

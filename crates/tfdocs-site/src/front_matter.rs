//! Front-matter extraction.
//!
//! A front-matter block is a fenced key/value section at the very top of a
//! markdown file. Two fence styles are recognized:
//!
//! - `---` ... `---` (or `...`): YAML
//! - `+++` ... `+++`: TOML
//!
//! Scalar values are kept as text; sequences, tables and nulls are dropped.

use std::collections::HashMap;

/// Parsed front-matter fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    fields: HashMap<String, String>,
}

impl FrontMatter {
    /// Value of a scalar field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Page title (`page_title`).
    #[must_use]
    pub fn page_title(&self) -> Option<&str> {
        self.get("page_title")
    }

    /// Registry layout name (`layout`).
    #[must_use]
    pub fn layout(&self) -> Option<&str> {
        self.get("layout")
    }

    /// Whether no fields were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

/// Parse the leading front-matter block of `content`.
///
/// Content without a complete fenced block yields an empty [`FrontMatter`].
///
/// # Errors
///
/// Returns the parser message if a fenced block exists but is not a
/// key/value mapping in its declared format.
pub fn parse(content: &str) -> Result<FrontMatter, String> {
    let Some((format, block)) = split(content) else {
        return Ok(FrontMatter::default());
    };

    if block.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let fields = match format {
        Format::Yaml => yaml_fields(block)?,
        Format::Toml => toml_fields(block)?,
    };

    Ok(FrontMatter { fields })
}

/// Locate the fenced block, returning its format and inner text.
fn split(content: &str) -> Option<(Format, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let opening = lines.next()?;
    let (format, closers): (Format, &[&str]) = match opening.trim_end() {
        "---" => (Format::Yaml, &["---", "..."]),
        "+++" => (Format::Toml, &["+++"]),
        _ => return None,
    };

    let start = opening.len();
    let mut offset = start;
    for line in lines {
        if closers.contains(&line.trim_end()) {
            return Some((format, &content[start..offset]));
        }
        offset += line.len();
    }

    None
}

fn yaml_fields(block: &str) -> Result<HashMap<String, String>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(block).map_err(|e| e.to_string())?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err("front matter must be a key/value mapping".to_owned());
    };

    let fields = mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.as_str()?.to_owned();
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect();

    Ok(fields)
}

fn toml_fields(block: &str) -> Result<HashMap<String, String>, String> {
    let table: toml::Table = toml::from_str(block).map_err(|e| e.to_string())?;

    let fields = table
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => return None,
            };
            Some((key, value))
        })
        .collect();

    Ok(fields)
}

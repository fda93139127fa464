//! `${VAR}` placeholders in configuration strings.
//!
//! Only braced placeholders are expanded. Everything outside them is copied
//! verbatim, so registry URLs may carry a literal `$` next to a placeholder.

use std::borrow::Cow;

use crate::ConfigError;

/// Replace every `${VAR}` / `${VAR:-default}` placeholder in `value`.
///
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some((literal, placeholder, after)) = next_placeholder(rest) {
        expanded.push_str(literal);
        expanded.push_str(&resolve(placeholder, field)?);
        rest = after;
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Split off the text before the next complete `${...}`, the placeholder
/// itself, and the remainder. An unclosed `${` is left as literal text.
fn next_placeholder(value: &str) -> Option<(&str, &str, &str)> {
    let start = value.find("${")?;
    let end = start + value[start..].find('}')?;
    Some((&value[..start], &value[start..=end], &value[end + 1..]))
}

/// Expand a single placeholder. Unset variables without a default are errors.
fn resolve(placeholder: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(placeholder, |name| {
        std::env::var(name).map(Some).map_err(|_| ())
    })
    .map(Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}

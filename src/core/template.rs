//! Format string parsing and label rendering
//!
//! A format string is literal text with `{token}` placeholders. Tokens are
//! matched lazily and never nest, so `{fs///home}` is one token.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::PathBuf;
use sysmon_types::{IconDirective, CLEAR_ICON_MARKER, USE_ICON_MARKER};

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(.+?)\}").expect("Invalid token regex"));

/// Tokens referenced by `text`, in order of first appearance, without duplicates
pub fn extract_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for caps in TOKEN_REGEX.captures_iter(text) {
        let token = &caps[1];
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Replace every `{old}` placeholder with `{new}`
pub fn rename_token(text: &str, old: &str, new: &str) -> String {
    text.replace(&format!("{{{}}}", old), &format!("{{{}}}", new))
}

/// Drop every `{name}` placeholder together with the space after it, or the
/// space before it at the end of the text
pub fn remove_token(text: &str, name: &str) -> String {
    let placeholder = format!("{{{}}}", name);
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(&placeholder) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + placeholder.len()..];
        if let Some(after) = rest.strip_prefix(' ') {
            rest = after;
        } else if rest.is_empty() && out.ends_with(' ') {
            out.pop();
        }
    }
    out.push_str(rest);
    out
}

/// Diagnostic shown instead of the label when a token cannot be resolved
pub fn invalid_sensor_label(token: &str) -> String {
    format!("Invalid Sensor: {}", token)
}

/// Diagnostic shown when resolution fails for any other reason
pub fn unknown_error_label(message: &str) -> String {
    format!("Unknown error: {}", message)
}

/// Split an icon directive out of a sensor value.
///
/// `text use_icon:/path/to/icon.png` yields `("text", Use(path))` and
/// `text clear_icon` yields `("text", Clear)`. Text before the marker is
/// trimmed; if nothing is left a single space is kept so the placeholder still
/// occupies room in the label. When both markers appear, `clear_icon` wins.
/// Markers match in any case; the path keeps its own.
pub fn extract_icon(value: &str) -> (String, Option<IconDirective>) {
    // ASCII lowering keeps byte offsets valid for `value`
    let lowered = value.to_ascii_lowercase();
    let use_pos = lowered.find(USE_ICON_MARKER);
    let clear_pos = lowered.find(CLEAR_ICON_MARKER);

    let directive = match (use_pos, clear_pos) {
        (_, Some(_)) => Some(IconDirective::Clear),
        (Some(pos), None) => {
            let rest = &value[pos + USE_ICON_MARKER.len()..];
            let path = rest.strip_prefix(':').unwrap_or(rest).trim();
            (!path.is_empty()).then(|| IconDirective::Use(PathBuf::from(path)))
        }
        (None, None) => None,
    };

    let text = match use_pos.into_iter().chain(clear_pos).min() {
        Some(pos) => remaining_text(&value[..pos]),
        None => value.to_string(),
    };

    (text, directive)
}

fn remaining_text(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        " ".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Result of rendering one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Label text (already trimmed)
    pub label: String,
    /// Icon change requested by a sensor value, last one wins
    pub icon: Option<IconDirective>,
}

impl Rendered {
    /// A diagnostic label with no icon change
    pub fn diagnostic(label: String) -> Self {
        Self { label, icon: None }
    }
}

/// A parsed format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    tokens: Vec<String>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tokens: extract_tokens(text),
        }
    }

    /// Distinct tokens in order of first appearance
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Substitute fetched values into the format string.
    ///
    /// Icon directives are stripped from each value first. A token without a
    /// value renders the whole label as an invalid-sensor diagnostic rather
    /// than partial output.
    pub fn render(&self, values: &HashMap<String, String>) -> Rendered {
        if let Some(missing) = self.tokens.iter().find(|t| !values.contains_key(*t)) {
            log::warn!("No value for sensor '{}'", missing);
            return Rendered::diagnostic(invalid_sensor_label(missing));
        }

        let mut icon = None;
        let mut visible: HashMap<&str, String> = HashMap::with_capacity(values.len());
        for token in &self.tokens {
            let (text, directive) = extract_icon(&values[token]);
            if directive.is_some() {
                icon = directive;
            }
            visible.insert(token.as_str(), text);
        }

        let label = TOKEN_REGEX.replace_all(&self.text, |caps: &Captures| {
            visible.get(&caps[1]).cloned().unwrap_or_default()
        });

        Rendered {
            label: label.trim().to_string(),
            icon,
        }
    }
}

//! Placeholder rendering - `{{state.key}}` / `{{context.key}}` substitution
//!
//! Single pass over cached tokens, Cow<str> for zero-alloc when a string holds
//! no placeholders. Unresolved references render as the empty string and are
//! reported back to the caller, which decides whether that is an error.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::ParamsError;

use super::scope::Scopes;
use super::token::{Reference, TemplateCache, Token};

/// How substituted values are escaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapePolicy {
    /// Substitute verbatim
    #[default]
    None,
    /// Mustache-style HTML escaping
    Html,
    /// Escape for inclusion inside a JSON string literal
    Json,
}

impl EscapePolicy {
    pub const VARIANTS: &'static str = "none, html, json";

    pub fn escape<'a>(&self, s: &'a str) -> Cow<'a, str> {
        match self {
            Self::None => Cow::Borrowed(s),
            Self::Html => escape_html(s),
            Self::Json => escape_for_json(s),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl FromStr for EscapePolicy {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(ParamsError::InvalidConfigValue {
                key: "escape".to_string(),
                value: s.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for EscapePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an unresolved placeholder means
///
/// `Empty` is the alerting default: a missing field blanks out that part of
/// the message and delivery goes ahead. `Strict` turns any unresolved
/// reference into an error for callers that validate before sending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    #[default]
    Empty,
    Strict,
}

impl MissingPolicy {
    pub const VARIANTS: &'static str = "empty, strict";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "strict" => Ok(Self::Strict),
            _ => Err(ParamsError::InvalidConfigValue {
                key: "missing".to_string(),
                value: s.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options applied to every string leaf of a transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub escape: EscapePolicy,
    pub missing: MissingPolicy,
}

/// Result of rendering one string
#[derive(Debug, Clone)]
pub struct Rendered<'a> {
    pub text: Cow<'a, str>,
    /// References that rendered as empty, in order of appearance
    pub unresolved: SmallVec<[Reference; 4]>,
}

/// Render every placeholder in `template` against `scopes`
///
/// Returns Cow::Borrowed when the string holds no placeholders.
///
/// Example: `Value "{{context.foo}}" exists` with context {foo: "fooVal"}
/// → `Value "fooVal" exists`
pub fn render<'a>(
    template: &'a str,
    scopes: &Scopes<'_>,
    escape: EscapePolicy,
    cache: &TemplateCache,
) -> Rendered<'a> {
    let borrowed = || Rendered {
        text: Cow::Borrowed(template),
        unresolved: SmallVec::new(),
    };

    // Early return with borrowed string (zero alloc)
    if !template.contains("{{") {
        return borrowed();
    }

    let tokens = cache.tokenize(template);
    if !tokens
        .iter()
        .any(|t| matches!(t, Token::Placeholder { .. }))
    {
        return borrowed();
    }

    let mut result = String::with_capacity(template.len() + 64);
    let mut unresolved: SmallVec<[Reference; 4]> = SmallVec::new();

    for token in tokens.iter() {
        match token {
            Token::Literal(range) => result.push_str(&template[range.clone()]),
            Token::Placeholder { raw, reference } => match scopes.lookup(reference) {
                Some(value) => {
                    let text = value_to_string(value);
                    if *raw {
                        result.push_str(&text);
                    } else {
                        result.push_str(&escape.escape(&text));
                    }
                }
                None => {
                    trace!(reference = %reference, "unresolved placeholder rendered empty");
                    unresolved.push(reference.clone());
                }
            },
        }
    }

    Rendered {
        text: Cow::Owned(result),
        unresolved,
    }
}

/// Convert a scope value to its substituted text
///
/// Strings verbatim, null as empty, integral floats without a fraction,
/// objects and arrays as compact JSON.
pub fn value_to_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(number_to_string(n)),
        other => Cow::Owned(other.to_string()),
    }
}

/// Integral floats below 1e21 print as plain decimal digits (no `.0`, no
/// exponent); larger and fractional values keep serde_json's formatting.
fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => f.to_string(),
        _ => n.to_string(),
    }
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'', '/', '`', '=']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for ch in s.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '/' => result.push_str("&#x2F;"),
            '`' => result.push_str("&#x60;"),
            '=' => result.push_str("&#x3D;"),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

fn escape_for_json(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::VariableScope;
    use serde_json::json;

    fn render_with(template: &str, state: &VariableScope, context: &VariableScope) -> String {
        let cache = TemplateCache::new();
        render(template, &Scopes::new(state, context), EscapePolicy::None, &cache)
            .text
            .into_owned()
    }

    #[test]
    fn render_context_value() {
        let state = VariableScope::new();
        let mut context = VariableScope::new();
        context.set("foo", "fooVal");

        assert_eq!(
            render_with("Value \"{{context.foo}}\" exists", &state, &context),
            "Value \"fooVal\" exists"
        );
    }

    #[test]
    fn render_missing_is_empty_and_reported() {
        let empty = VariableScope::new();
        let cache = TemplateCache::new();
        let rendered = render(
            "This message \"{{context.value2}}\" is missing",
            &Scopes::new(&empty, &empty),
            EscapePolicy::None,
            &cache,
        );

        assert_eq!(rendered.text, "This message \"\" is missing");
        assert_eq!(rendered.unresolved.len(), 1);
        assert_eq!(rendered.unresolved[0].to_string(), "context.value2");
    }

    #[test]
    fn render_unknown_namespace_is_empty() {
        let mut state = VariableScope::new();
        state.set("id", "x");
        assert_eq!(render_with("[{{alert.id}}]", &state, &state), "[]");
    }

    #[test]
    fn render_no_templates_is_borrowed() {
        let empty = VariableScope::new();
        let cache = TemplateCache::new();
        let rendered = render("No templates here", &Scopes::new(&empty, &empty), EscapePolicy::None, &cache);
        assert!(matches!(rendered.text, Cow::Borrowed(_)));
        // Nothing tokenized for brace-free strings
        assert!(cache.is_empty());
    }

    #[test]
    fn render_malformed_braces_is_borrowed() {
        let empty = VariableScope::new();
        let cache = TemplateCache::new();
        let rendered = render("{{ not closed", &Scopes::new(&empty, &empty), EscapePolicy::None, &cache);
        assert_eq!(rendered.text, "{{ not closed");
        assert!(matches!(rendered.text, Cow::Borrowed(_)));
    }

    #[test]
    fn render_multiple_occurrences() {
        let mut state = VariableScope::new();
        state.set("n", 2);
        assert_eq!(
            render_with("{{state.n}}+{{state.n}}={{ state.sum }}", &state, &VariableScope::new()),
            "2+2="
        );
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let mut context = VariableScope::new();
        context.set("a", "{{context.b}}");
        context.set("b", "nope");
        assert_eq!(
            render_with("{{context.a}}", &VariableScope::new(), &context),
            "{{context.b}}"
        );
    }

    #[test]
    fn value_to_string_scalars() {
        assert_eq!(value_to_string(&json!("s")), "s");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(-7)), "-7");
        assert_eq!(value_to_string(&json!(1.0)), "1");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(-0.0)), "0");
    }

    #[test]
    fn value_to_string_large_integral_floats_have_no_exponent() {
        assert_eq!(value_to_string(&json!(1e15)), "1000000000000000");
        assert_eq!(value_to_string(&json!(1e20)), "100000000000000000000");
        assert_eq!(value_to_string(&json!(-3e17)), "-300000000000000000");
        assert_eq!(value_to_string(&json!(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn value_to_string_structured_is_compact_json() {
        assert_eq!(value_to_string(&json!([1, "a"])), "[1,\"a\"]");
        assert_eq!(value_to_string(&json!({"x": 1})), "{\"x\":1}");
    }

    #[test]
    fn escape_html_policy() {
        let mut context = VariableScope::new();
        context.set("v", "<b>\"Tom & Jerry\"</b>");
        let cache = TemplateCache::new();
        let empty = VariableScope::new();
        let scopes = Scopes::new(&empty, &context);

        let escaped = render("{{context.v}}", &scopes, EscapePolicy::Html, &cache);
        assert_eq!(
            escaped.text,
            "&lt;b&gt;&quot;Tom &amp; Jerry&quot;&lt;&#x2F;b&gt;"
        );

        let raw = render("{{{context.v}}}", &scopes, EscapePolicy::Html, &cache);
        assert_eq!(raw.text, "<b>\"Tom & Jerry\"</b>");
    }

    #[test]
    fn escape_json_policy() {
        let mut context = VariableScope::new();
        context.set("v", "line \"one\"\nline\ttwo\\");
        let cache = TemplateCache::new();
        let empty = VariableScope::new();
        let rendered = render(
            "{\"text\": \"{{context.v}}\"}",
            &Scopes::new(&empty, &context),
            EscapePolicy::Json,
            &cache,
        );
        assert_eq!(rendered.text, "{\"text\": \"line \\\"one\\\"\\nline\\ttwo\\\\\"}");
        let parsed: Value = serde_json::from_str(&rendered.text).unwrap();
        assert_eq!(parsed["text"], json!("line \"one\"\nline\ttwo\\"));
    }

    #[test]
    fn policies_parse_case_insensitively() {
        assert_eq!("HTML".parse::<EscapePolicy>().unwrap(), EscapePolicy::Html);
        assert_eq!(" strict ".parse::<MissingPolicy>().unwrap(), MissingPolicy::Strict);

        let err = "xml".parse::<EscapePolicy>().unwrap_err();
        assert_eq!(err.code(), "PARAMS-021");
        assert!(err.to_string().contains("none, html, json"));
    }
}

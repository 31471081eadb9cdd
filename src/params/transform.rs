//! Parameter Transformer - renders every string leaf of an action's params
//!
//! Shape-preserving depth-first walk: records keep their keys and order,
//! sequences keep their length, non-string leaves are cloned untouched.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::config::ParamsConfig;
use crate::error::{ParamsError, Result};
use crate::template::{
    render, MissingPolicy, Reference, RenderOptions, Scopes, TemplateCache, VariableScope,
};

use super::value::ParamValue;

/// Process-wide transformer with default options (no escaping, missing → "")
static DEFAULT_TRANSFORMER: LazyLock<Transformer> = LazyLock::new(Transformer::default);

/// Render action params against the alert state and firing context
///
/// Never fails: unresolved placeholders become empty strings.
///
/// Example: `{"message": "Value {{context.foo}}"}` with context {foo: "x"}
/// → `{"message": "Value x"}`
pub fn transform_action_params(
    params: &ParamValue,
    state: &VariableScope,
    context: &VariableScope,
) -> ParamValue {
    DEFAULT_TRANSFORMER
        .transform_report(params, &Scopes::new(state, context))
        .params
}

/// Rendered tree plus every reference that rendered empty
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub params: ParamValue,
    /// Deduplicated, in order of first appearance
    pub unresolved: Vec<Reference>,
}

/// Configurable transformer with its own tokenization cache
#[derive(Debug, Default)]
pub struct Transformer {
    options: RenderOptions,
    cache: TemplateCache,
}

impl Transformer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            cache: TemplateCache::new(),
        }
    }

    pub fn from_config(config: &ParamsConfig) -> Self {
        Self::new(config.render_options())
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Transform honoring the missing policy
    ///
    /// `MissingPolicy::Strict` fails with every unresolved reference listed.
    pub fn transform(&self, params: &ParamValue, scopes: &Scopes<'_>) -> Result<ParamValue> {
        let Transformed { params, unresolved } = self.transform_report(params, scopes);

        match self.options.missing {
            MissingPolicy::Strict if !unresolved.is_empty() => {
                Err(ParamsError::UnresolvedReferences {
                    count: unresolved.len(),
                    refs: unresolved
                        .iter()
                        .map(Reference::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
            }
            MissingPolicy::Strict | MissingPolicy::Empty => Ok(params),
        }
    }

    /// Transform without failing, reporting unresolved references
    pub fn transform_report(&self, params: &ParamValue, scopes: &Scopes<'_>) -> Transformed {
        let mut unresolved = Unresolved::default();
        let params = self.transform_node(params, scopes, &mut unresolved);

        if !unresolved.refs.is_empty() {
            debug!(
                count = unresolved.refs.len(),
                "unresolved references rendered as empty strings"
            );
        }

        Transformed {
            params,
            unresolved: unresolved.refs,
        }
    }

    fn transform_node(
        &self,
        value: &ParamValue,
        scopes: &Scopes<'_>,
        unresolved: &mut Unresolved,
    ) -> ParamValue {
        match value {
            ParamValue::String(template) => {
                let rendered = render(template, scopes, self.options.escape, &self.cache);
                unresolved.extend(rendered.unresolved);
                ParamValue::String(rendered.text.into_owned())
            }
            ParamValue::Record(fields) => ParamValue::Record(
                fields
                    .iter()
                    .map(|(key, v)| (key.clone(), self.transform_node(v, scopes, unresolved)))
                    .collect(),
            ),
            ParamValue::Sequence(items) => ParamValue::Sequence(
                items
                    .iter()
                    .map(|v| self.transform_node(v, scopes, unresolved))
                    .collect(),
            ),
            ParamValue::Absent | ParamValue::Null | ParamValue::Bool(_) | ParamValue::Number(_) => {
                value.clone()
            }
        }
    }
}

/// Ordered set of unresolved references
#[derive(Default)]
struct Unresolved {
    seen: FxHashSet<Reference>,
    refs: Vec<Reference>,
}

impl Unresolved {
    fn extend(&mut self, refs: impl IntoIterator<Item = Reference>) {
        for reference in refs {
            if self.seen.insert(reference.clone()) {
                self.refs.push(reference);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::EscapePolicy;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn scope(value: serde_json::Value) -> VariableScope {
        match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => VariableScope::new(),
        }
    }

    #[test]
    fn skips_non_string_parameters() {
        let params = ParamValue::record([
            ("boolean", ParamValue::Bool(true)),
            ("number", ParamValue::from(1_i64)),
            ("empty1", ParamValue::Null),
            ("empty2", ParamValue::Absent),
            ("date", ParamValue::from("2019-02-12T21:01:22.479Z")),
        ]);
        let empty = VariableScope::new();

        let result = transform_action_params(&params, &empty, &empty);
        assert_eq!(result, params);
    }

    #[test]
    fn missing_parameters_get_emptied_out() {
        let params = ParamValue::from(json!({
            "message1": "{{context.value}}",
            "message2": "This message \"{{context.value2}}\" is missing",
        }));
        let empty = VariableScope::new();

        let result = transform_action_params(&params, &empty, &empty);
        assert_eq!(
            result,
            ParamValue::from(json!({
                "message1": "",
                "message2": "This message \"\" is missing",
            }))
        );
    }

    #[test]
    fn sequences_are_traversed() {
        let params = ParamValue::from(json!({"to": ["{{context.a}}", 7, ["{{state.b}}"]]}));
        let result = transform_action_params(
            &params,
            &scope(json!({"b": "B"})),
            &scope(json!({"a": "A"})),
        );
        assert_eq!(result, ParamValue::from(json!({"to": ["A", 7, ["B"]]})));
    }

    #[test]
    fn record_order_is_preserved() {
        let params = ParamValue::from(json!({"z": "{{state.x}}", "a": "1", "m": {"k2": 1, "k1": 2}}));
        let empty = VariableScope::new();
        let result = transform_action_params(&params, &empty, &empty);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"z":"","a":"1","m":{"k2":1,"k1":2}}"#
        );
    }

    #[test]
    fn report_lists_unresolved_once_in_order() {
        let params = ParamValue::from(json!({
            "a": "{{context.x}} {{state.y}}",
            "b": ["{{context.x}}", "{{alert.z}}"],
        }));
        let empty = VariableScope::new();
        let transformer = Transformer::default();

        let report = transformer.transform_report(&params, &Scopes::new(&empty, &empty));
        let names: Vec<String> = report.unresolved.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["context.x", "state.y", "alert.z"]);
    }

    #[test]
    fn strict_policy_fails_on_unresolved() {
        let transformer = Transformer::new(RenderOptions {
            missing: MissingPolicy::Strict,
            ..Default::default()
        });
        let params = ParamValue::from(json!({"m": "{{context.value}} {{state.other}}"}));
        let empty = VariableScope::new();

        let err = transformer
            .transform(&params, &Scopes::new(&empty, &empty))
            .unwrap_err();
        assert_eq!(err.code(), "PARAMS-010");
        assert!(err.to_string().contains("context.value, state.other"));
    }

    #[test]
    fn strict_policy_passes_when_resolved() {
        let transformer = Transformer::new(RenderOptions {
            missing: MissingPolicy::Strict,
            ..Default::default()
        });
        let params = ParamValue::from(json!({"m": "{{context.value}}"}));
        let state = VariableScope::new();
        let context = scope(json!({"value": 5}));

        let result = transformer
            .transform(&params, &Scopes::new(&state, &context))
            .unwrap();
        assert_eq!(result, ParamValue::from(json!({"m": "5"})));
    }

    #[test]
    fn escape_policy_applies_to_leaves() {
        let transformer = Transformer::new(RenderOptions {
            escape: EscapePolicy::Html,
            ..Default::default()
        });
        let params = ParamValue::from(json!({"m": "<{{context.v}}>"}));
        let state = VariableScope::new();
        let context = scope(json!({"v": "<i>"}));

        let result = transformer
            .transform(&params, &Scopes::new(&state, &context))
            .unwrap();
        // Template text itself is never escaped
        assert_eq!(result, ParamValue::from(json!({"m": "<&lt;i&gt;>"})));
    }

    #[test]
    fn from_config_applies_render_settings() {
        let config: ParamsConfig =
            toml::from_str("[render]\nescape = \"html\"\nmissing = \"strict\"\n").unwrap();
        let transformer = Transformer::from_config(&config);
        assert_eq!(transformer.options().escape, EscapePolicy::Html);
        assert_eq!(transformer.options().missing, MissingPolicy::Strict);

        let state = VariableScope::new();
        let context = scope(json!({"v": "a&b"}));
        let scopes = Scopes::new(&state, &context);

        let result = transformer
            .transform(&ParamValue::from(json!({"m": "{{context.v}}"})), &scopes)
            .unwrap();
        assert_eq!(result, ParamValue::from(json!({"m": "a&amp;b"})));

        let err = transformer
            .transform(&ParamValue::from(json!({"m": "{{context.nope}}"})), &scopes)
            .unwrap_err();
        assert_eq!(err.code(), "PARAMS-010");
    }

    #[test]
    fn from_config_defaults_match_default_transformer() {
        let transformer = Transformer::from_config(&ParamsConfig::default());
        assert_eq!(transformer.options(), Transformer::default().options());
    }

    #[test]
    fn cache_is_shared_across_calls() {
        let transformer = Transformer::default();
        let params = ParamValue::from(json!({"a": "{{context.x}}", "b": "{{context.x}}", "c": "plain"}));
        let empty = VariableScope::new();
        let scopes = Scopes::new(&empty, &empty);

        transformer.transform_report(&params, &scopes);
        transformer.transform_report(&params, &scopes);
        // Only the one distinct templated string is tokenized
        assert_eq!(transformer.cache().len(), 1);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let params = ParamValue::from(json!({"m": "{{state.v}}"}));
        let before = params.clone();
        let state = scope(json!({"v": "s"}));
        let _ = transform_action_params(&params, &state, &VariableScope::new());
        assert_eq!(params, before);
    }
}

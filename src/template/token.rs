//! Placeholder tokenizer with caching
//!
//! Templates are split once into literal ranges and placeholders, then cached
//! behind an `Arc` so repeated renders of the same action parameter skip the
//! regex scan entirely.

use std::fmt;
use std::ops::Range;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use regex::Regex;
use smallvec::SmallVec;

use crate::util::constants::MAX_CACHED_TEMPLATES;

/// `{{{ ns.key }}}` (raw) or `{{ ns.key }}` (escaped).
///
/// Segments are ASCII word characters or `-`. Anything else between braces is
/// left as literal text.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\{\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}\}|\{\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}",
    )
    .unwrap()
});

/// Dotted reference inside a placeholder: `namespace.key[.segment...]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// First segment, selects the scope (`state` or `context`)
    pub namespace: String,
    /// Key followed by nested segments. Empty for `{{state}}`.
    pub path: SmallVec<[String; 2]>,
}

impl Reference {
    /// Parse a dotted reference, rejecting empty or non-word segments
    ///
    /// Example: "context.alert.id" → namespace "context", path ["alert", "id"]
    pub fn parse(dotted: &str) -> Option<Self> {
        let mut segments = dotted.split('.');
        let namespace = segments.next()?;
        if !is_segment(namespace) {
            return None;
        }

        let mut path = SmallVec::new();
        for segment in segments {
            if !is_segment(segment) {
                return None;
            }
            path.push(segment.to_string());
        }

        Some(Self {
            namespace: namespace.to_string(),
            path,
        })
    }

    /// The scope key (first segment after the namespace)
    pub fn key(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.namespace)?;
        for segment in &self.path {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Token representing a parsed template fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text (stores range in original string)
    Literal(Range<usize>),
    /// Placeholder; `raw` is true for triple braces (never escaped)
    Placeholder { raw: bool, reference: Reference },
}

/// Split a template into literal and placeholder tokens
pub fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let Some(m) = cap.get(0) else { continue };
        let (raw, dotted) = match (cap.get(1), cap.get(2)) {
            (Some(inner), _) => (true, inner.as_str()),
            (None, Some(inner)) => (false, inner.as_str()),
            (None, None) => continue,
        };
        // Unparseable content stays inside the next literal range
        let Some(reference) = Reference::parse(dotted) else {
            continue;
        };

        if m.start() > last_end {
            tokens.push(Token::Literal(last_end..m.start()));
        }
        tokens.push(Token::Placeholder { raw, reference });
        last_end = m.end();
    }

    if last_end < template.len() {
        tokens.push(Token::Literal(last_end..template.len()));
    }

    tokens
}

/// Extract all references from a template, in order of appearance
///
/// Example: "{{context.host}} is {{state.status}}" → [context.host, state.status]
pub fn extract_refs(template: &str) -> Vec<Reference> {
    tokenize(template)
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder { reference, .. } => Some(reference),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Tokenization cache shared by every render of one transformer
///
/// Bounded by `MAX_CACHED_TEMPLATES`; once full, new templates are tokenized
/// on each call without being stored.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: DashMap<String, Arc<Vec<Token>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize a template, reusing the cached tokens when present
    pub fn tokenize(&self, template: &str) -> Arc<Vec<Token>> {
        if let Some(cached) = self.entries.get(template) {
            return Arc::clone(&cached);
        }

        let tokens = Arc::new(tokenize(template));
        if self.entries.len() < MAX_CACHED_TEMPLATES {
            self.entries
                .insert(template.to_string(), Arc::clone(&tokens));
        }
        tokens
    }

    /// Number of cached templates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

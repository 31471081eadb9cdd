//! Centralized constants for template rendering
//!
//! Namespace names, cache bounds and environment variable names in one place.

// ═══════════════════════════════════════════════════════════════
// Placeholder Namespaces
// ═══════════════════════════════════════════════════════════════

/// Namespace for alert state values: `{{state.key}}`
pub const STATE_NAMESPACE: &str = "state";

/// Namespace for firing context values: `{{context.key}}`
pub const CONTEXT_NAMESPACE: &str = "context";

// ═══════════════════════════════════════════════════════════════
// Tokenization Cache
// ═══════════════════════════════════════════════════════════════

/// Maximum number of distinct templates kept in a transformer's cache.
///
/// Past this bound templates are tokenized on every render.
pub const MAX_CACHED_TEMPLATES: usize = 4096;

// ═══════════════════════════════════════════════════════════════
// Environment Overrides
// ═══════════════════════════════════════════════════════════════

/// Overrides the configured escape policy (none, html, json)
pub const ENV_ESCAPE: &str = "ACTION_PARAMS_ESCAPE";

/// Overrides the configured missing-reference policy (empty, strict)
pub const ENV_MISSING: &str = "ACTION_PARAMS_MISSING";

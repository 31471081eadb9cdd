//! Static reference extraction over a whole parameter tree
//!
//! Used before an action is saved: lists what a set of params will read from
//! the scopes and rejects namespaces that can never resolve.

use crate::error::Result;
use crate::template::{extract_refs, validate_refs, Reference};

use super::value::ParamValue;

/// Every placeholder reference in string leaves, depth-first, in order
///
/// Duplicates are kept; callers that want a set dedup themselves.
pub fn collect_references(params: &ParamValue) -> Vec<Reference> {
    params
        .strings()
        .into_iter()
        .flat_map(extract_refs)
        .collect()
}

/// Fail on the first reference whose namespace is not `state` or `context`
pub fn validate_references(params: &ParamValue) -> Result<()> {
    params.strings().into_iter().try_for_each(validate_refs)
}

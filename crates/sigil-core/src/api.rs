//! # One-Shot Convenience API
//!
//! Wrappers for the common "text in, decision out" cases. Hosts that
//! evaluate a compiled label many times should parse once with
//! [`crate::parse`] and call [`crate::eval::eval`] per request; these
//! helpers trade that reuse for a single call.

use crate::error::SyntaxError;
use crate::eval::{eval, RequestContext};
use crate::expr::AttributeExpr;
use crate::parse::{parse_attr_value_list, parse_expr, parse_hierarchy};
use crate::values::{AttributeValueSet, ValueTerm};

/// Canonical rendering of an expression. Always re-parses to an equal
/// expression.
#[must_use]
pub fn serialize(expr: &AttributeExpr) -> String {
    expr.to_string()
}

/// Parse a label and return its canonical rendering.
pub fn canonical_label(label: &str) -> Result<String, SyntaxError> {
    Ok(serialize(&parse_expr(label)?))
}

/// Whether `attributes` (label syntax, e.g. `role=engineer, admin`)
/// satisfy `label`, with no hierarchies in force.
pub fn label_allows(label: &str, attributes: &str) -> Result<bool, SyntaxError> {
    label_allows_with(label, attributes, &[])
}

/// Whether `attributes` satisfy `label` under the given hierarchy
/// declarations (each in `name: v1, v2, ...` syntax).
pub fn label_allows_with(
    label: &str,
    attributes: &str,
    hierarchies: &[&str],
) -> Result<bool, SyntaxError> {
    let expr = parse_expr(label)?;
    let set: AttributeValueSet = parse_attr_value_list(attributes)?.into_iter().collect();
    let mut ctx = RequestContext::new(set);
    for text in hierarchies {
        ctx = ctx.with_hierarchy(parse_hierarchy(text)?);
    }
    Ok(eval(&expr, &ctx) == ValueTerm::TRUE)
}

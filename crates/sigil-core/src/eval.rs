//! # Evaluator
//!
//! Pure evaluation of a parsed [`AttributeExpr`] against a requester's
//! attributes. No side effects, no allocation beyond the result, fully
//! deterministic for fixed inputs. A compiled expression may be
//! evaluated concurrently by many threads against different contexts.
//!
//! Lookup goes through the [`EvalContext`] trait so tests can observe
//! evaluation order and hosts can back attribute data however they
//! like. [`RequestContext`] is the standard implementation: one
//! attribute value set plus registered hierarchies.

use std::collections::{BTreeMap, BTreeSet};

use crate::expr::{AttributeExpr, Operator, Relation, SetTest};
use crate::hierarchy::{Hierarchy, HierarchyOrdering};
use crate::values::{Attribute, AttributeValueSet, ValueTerm};

// =============================================================================
// EVALUATION CONTEXT
// =============================================================================

/// What the evaluator needs to know about a request.
pub trait EvalContext {
    /// Values asserted for an attribute, or `None` when absent.
    fn values(&self, attribute: &Attribute) -> Option<&BTreeSet<ValueTerm>>;

    /// The hierarchy governing an attribute, if one is registered.
    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy>;
}

/// A requester's attributes plus the hierarchies in force.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    attributes: AttributeValueSet,
    hierarchies: BTreeMap<Attribute, Hierarchy>,
}

impl RequestContext {
    #[must_use]
    pub fn new(attributes: AttributeValueSet) -> Self {
        Self {
            attributes,
            hierarchies: BTreeMap::new(),
        }
    }

    /// Register a hierarchy for its attribute, replacing any previous
    /// hierarchy registered for the same attribute.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.hierarchies
            .insert(hierarchy.attribute().clone(), hierarchy);
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeValueSet {
        &self.attributes
    }
}

impl EvalContext for RequestContext {
    fn values(&self, attribute: &Attribute) -> Option<&BTreeSet<ValueTerm>> {
        self.attributes.get(attribute)
    }

    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy> {
        self.hierarchies.get(attribute)
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Evaluate an expression against a request context.
///
/// Absent attributes make tests false, never an error.
#[must_use]
pub fn eval<C: EvalContext>(expr: &AttributeExpr, ctx: &C) -> ValueTerm {
    match expr {
        AttributeExpr::Allow => ValueTerm::TRUE,
        AttributeExpr::Deny => ValueTerm::FALSE,
        AttributeExpr::Attribute(attribute) => eval_bare(attribute, ctx),
        AttributeExpr::Relation(relation) => eval_relation(relation, ctx),
        AttributeExpr::InSet(set) => eval_set(set, ctx),
        AttributeExpr::And(left, right) => {
            let lhs = eval(left.as_ref(), ctx);
            if lhs == ValueTerm::FALSE {
                return ValueTerm::FALSE;
            }
            eval(right.as_ref(), ctx)
        }
        AttributeExpr::Or(left, right) => {
            let lhs = eval(left.as_ref(), ctx);
            if lhs == ValueTerm::TRUE {
                return ValueTerm::TRUE;
            }
            eval(right.as_ref(), ctx)
        }
    }
}

/// Any value other than boolean false satisfies a bare attribute test.
fn is_truthy(value: &ValueTerm) -> bool {
    value != &ValueTerm::FALSE
}

fn eval_bare<C: EvalContext>(attribute: &Attribute, ctx: &C) -> ValueTerm {
    let Some(values) = ctx.values(attribute) else {
        return ValueTerm::FALSE;
    };
    if values.iter().any(is_truthy) {
        ValueTerm::TRUE
    } else {
        ValueTerm::FALSE
    }
}

fn eval_relation<C: EvalContext>(relation: &Relation, ctx: &C) -> ValueTerm {
    let Some(asserted) = ctx.values(&relation.attribute) else {
        return ValueTerm::FALSE;
    };
    match relation.op {
        Operator::Eq => {
            let satisfied = asserted
                .iter()
                .any(|value| satisfies_eq(ctx, &relation.attribute, &relation.value, value));
            ValueTerm::Boolean(satisfied)
        }
        Operator::Ne => {
            // Structural, per asserted value: satisfied when any
            // asserted value differs from the required value.
            // Hierarchies do not widen inequality.
            let satisfied = asserted.iter().any(|value| value != &relation.value);
            ValueTerm::Boolean(satisfied)
        }
        // Ordinal forms never reach here; the parser rejects them.
        Operator::Lt | Operator::Le | Operator::Ge | Operator::Gt => ValueTerm::FALSE,
    }
}

/// Equality under an optional hierarchy: exact match, or the asserted
/// value ranks at or above the required value.
fn satisfies_eq<C: EvalContext>(
    ctx: &C,
    attribute: &Attribute,
    required: &ValueTerm,
    asserted: &ValueTerm,
) -> bool {
    if required == asserted {
        return true;
    }
    let Some(hierarchy) = ctx.hierarchy(attribute) else {
        return false;
    };
    matches!(
        hierarchy.compare(required, asserted),
        HierarchyOrdering::Eq | HierarchyOrdering::Lt
    )
}

/// Membership test. With listed members: some asserted value is in the
/// list, or under a hierarchy ranks at or above the lowest listed
/// member. With no members: the attribute is merely present.
fn eval_set<C: EvalContext>(set: &SetTest, ctx: &C) -> ValueTerm {
    let Some(asserted) = ctx.values(&set.attribute) else {
        return ValueTerm::FALSE;
    };
    if set.members.is_empty() {
        return ValueTerm::TRUE;
    }
    let direct = asserted.iter().any(|value| set.members.contains(value));
    if direct {
        return ValueTerm::TRUE;
    }
    let Some(hierarchy) = ctx.hierarchy(&set.attribute) else {
        return ValueTerm::FALSE;
    };
    // The least-ranked listed member sets the threshold.
    let Some(threshold) = set
        .members
        .iter()
        .filter_map(|member| hierarchy.rank(member).map(|rank| (rank, member)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, member)| member)
    else {
        return ValueTerm::FALSE;
    };
    let satisfied = asserted.iter().any(|value| {
        matches!(
            hierarchy.compare(threshold, value),
            HierarchyOrdering::Eq | HierarchyOrdering::Lt
        )
    });
    ValueTerm::Boolean(satisfied)
}

// =============================================================================
// TESTS
// =============================================================================

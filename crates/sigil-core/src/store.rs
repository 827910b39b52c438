//! # Attribute Stores
//!
//! Where requester attributes come from. The engine itself imposes no
//! format on identity data; [`AttributesStore`] is the seam, and
//! [`LocalAttributesStore`] is the in-memory implementation used by
//! the tools: users mapped to attribute value sets, plus the
//! hierarchies in force, both loaded from label-syntax text.

use std::collections::BTreeMap;

use crate::error::SyntaxError;
use crate::eval::{eval, EvalContext};
use crate::expr::AttributeExpr;
use crate::hierarchy::Hierarchy;
use crate::parse::{parse_attr_value_list, parse_hierarchy};
use crate::values::{Attribute, AttributeValueSet, ValueTerm};

/// Source of requester attributes and hierarchies.
pub trait AttributesStore {
    /// Attributes asserted for a user, or `None` for unknown users.
    fn attributes(&self, user: &str) -> Option<&AttributeValueSet>;

    /// The hierarchy governing an attribute, if any.
    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy>;

    /// Evaluate a label for a user. Unknown users satisfy nothing but
    /// the allow-all label.
    fn evaluate(&self, user: &str, expr: &AttributeExpr) -> ValueTerm
    where
        Self: Sized,
    {
        match self.attributes(user) {
            Some(attributes) => {
                let ctx = StoreEvalContext {
                    store: self,
                    attributes,
                };
                eval(expr, &ctx)
            }
            None => eval(expr, &EmptyContext { store: self }),
        }
    }
}

/// Evaluation context borrowing a user's attributes from a store.
struct StoreEvalContext<'a, S: AttributesStore> {
    store: &'a S,
    attributes: &'a AttributeValueSet,
}

impl<S: AttributesStore> EvalContext for StoreEvalContext<'_, S> {
    fn values(
        &self,
        attribute: &Attribute,
    ) -> Option<&std::collections::BTreeSet<ValueTerm>> {
        self.attributes.get(attribute)
    }

    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy> {
        self.store.hierarchy(attribute)
    }
}

/// Context for a user with no attributes at all.
struct EmptyContext<'a, S: AttributesStore> {
    store: &'a S,
}

impl<S: AttributesStore> EvalContext for EmptyContext<'_, S> {
    fn values(
        &self,
        _attribute: &Attribute,
    ) -> Option<&std::collections::BTreeSet<ValueTerm>> {
        None
    }

    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy> {
        self.store.hierarchy(attribute)
    }
}

// =============================================================================
// LOCAL STORE
// =============================================================================

/// In-memory store keyed by user name.
#[derive(Debug, Clone, Default)]
pub struct LocalAttributesStore {
    users: BTreeMap<String, AttributeValueSet>,
    hierarchies: BTreeMap<Attribute, Hierarchy>,
}

impl LocalAttributesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user's attributes, replacing any previous set.
    pub fn put_attributes(&mut self, user: impl Into<String>, attributes: AttributeValueSet) {
        self.users.insert(user.into(), attributes);
    }

    /// Set a user's attributes from label syntax, e.g.
    /// `role=engineer, clearance=secret, admin`.
    pub fn parse_attributes(
        &mut self,
        user: impl Into<String>,
        text: &str,
    ) -> Result<(), SyntaxError> {
        let attributes: AttributeValueSet =
            parse_attr_value_list(text)?.into_iter().collect();
        self.put_attributes(user, attributes);
        Ok(())
    }

    /// Register a hierarchy, replacing any previous one for the same
    /// attribute.
    pub fn put_hierarchy(&mut self, hierarchy: Hierarchy) {
        self.hierarchies
            .insert(hierarchy.attribute().clone(), hierarchy);
    }

    /// Register a hierarchy from label syntax, e.g.
    /// `clearance: public, confidential, secret`.
    pub fn parse_hierarchy(&mut self, text: &str) -> Result<(), SyntaxError> {
        self.put_hierarchy(parse_hierarchy(text)?);
        Ok(())
    }

    /// Known users, in order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    /// Registered hierarchies, in attribute order.
    pub fn hierarchies(&self) -> impl Iterator<Item = &Hierarchy> {
        self.hierarchies.values()
    }
}

impl AttributesStore for LocalAttributesStore {
    fn attributes(&self, user: &str) -> Option<&AttributeValueSet> {
        self.users.get(user)
    }

    fn hierarchy(&self, attribute: &Attribute) -> Option<&Hierarchy> {
        self.hierarchies.get(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_expr;

    fn store() -> LocalAttributesStore {
        let mut s = LocalAttributesStore::new();
        s.parse_attributes("alice", "role=engineer, clearance=secret")
            .expect("attrs");
        s.parse_attributes("bob", "role=sales, clearance=public")
            .expect("attrs");
        s.parse_hierarchy("clearance: public, confidential, secret")
            .expect("hierarchy");
        s
    }

    fn allowed(store: &LocalAttributesStore, user: &str, label: &str) -> bool {
        let expr = parse_expr(label).expect("label");
        store.evaluate(user, &expr) == ValueTerm::TRUE
    }

    #[test]
    fn evaluates_per_user() {
        let s = store();
        assert!(allowed(&s, "alice", "role = engineer"));
        assert!(!allowed(&s, "bob", "role = engineer"));
    }

    #[test]
    fn store_hierarchies_apply() {
        let s = store();
        assert!(allowed(&s, "alice", "clearance = confidential"));
        assert!(!allowed(&s, "bob", "clearance = confidential"));
    }

    #[test]
    fn unknown_user_gets_only_allow_all() {
        let s = store();
        assert!(!allowed(&s, "mallory", "role = engineer"));
        assert!(!allowed(&s, "mallory", "role != engineer"));
        assert!(allowed(&s, "mallory", "*"));
    }

    #[test]
    fn replacement_semantics() {
        let mut s = store();
        s.parse_attributes("alice", "role=manager").expect("attrs");
        assert!(!allowed(&s, "alice", "role = engineer"));
        assert!(allowed(&s, "alice", "role = manager"));
    }
}

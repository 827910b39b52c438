//! # Attribute Expressions
//!
//! The abstract syntax of a label. A label is either one of the two
//! whole-label constants (`*` allow-all, `!` deny-all) or a boolean
//! expression over attribute tests:
//!
//! - `attr` — presence/truth test
//! - `attr = value` / `attr != value` — relation test
//! - `{ attr, v1, v2 }` — set membership test
//! - `e && e` / `e || e` — conjunction and disjunction
//!
//! The enum is closed: evaluation and serialization are total matches,
//! so adding a node form is a compile-time visible change.
//!
//! [`std::fmt::Display`] renders canonical label syntax that parses
//! back to an equal expression.

use crate::values::{Attribute, ValueTerm};

// =============================================================================
// OPERATORS
// =============================================================================

/// Relation operators.
///
/// All six tokenize; only `=` (and its alias `==`) and `!=` are
/// accepted by the parser today. The ordinal forms are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl Operator {
    /// The surface syntax of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Gt => ">",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// EXPRESSION NODES
// =============================================================================

/// A relation test: `attribute op value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub attribute: Attribute,
    pub op: Operator,
    pub value: ValueTerm,
}

/// A set membership test: `{ attribute, v1, v2 }`.
///
/// With no members this is a bare presence test on the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTest {
    pub attribute: Attribute,
    pub members: Vec<ValueTerm>,
}

/// An attribute expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeExpr {
    /// The whole-label constant `*`: visible to everyone.
    Allow,
    /// The whole-label constant `!`: visible to no one.
    Deny,
    /// Presence/truth test on a bare attribute.
    Attribute(Attribute),
    /// `attribute op value`.
    Relation(Relation),
    /// `{ attribute, v1, v2 }`.
    InSet(SetTest),
    /// Conjunction, short-circuiting left to right.
    And(Box<AttributeExpr>, Box<AttributeExpr>),
    /// Disjunction, short-circuiting left to right.
    Or(Box<AttributeExpr>, Box<AttributeExpr>),
}

impl AttributeExpr {
    /// An `attr = value` relation.
    #[must_use]
    pub fn eq(attribute: Attribute, value: ValueTerm) -> Self {
        AttributeExpr::Relation(Relation {
            attribute,
            op: Operator::Eq,
            value,
        })
    }

    /// An `attr != value` relation.
    #[must_use]
    pub fn ne(attribute: Attribute, value: ValueTerm) -> Self {
        AttributeExpr::Relation(Relation {
            attribute,
            op: Operator::Ne,
            value,
        })
    }

    #[must_use]
    pub fn and(left: AttributeExpr, right: AttributeExpr) -> Self {
        AttributeExpr::And(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn or(left: AttributeExpr, right: AttributeExpr) -> Self {
        AttributeExpr::Or(Box::new(left), Box::new(right))
    }

    /// Binding strength, used when rendering parentheses.
    fn precedence(&self) -> u8 {
        match self {
            AttributeExpr::Or(_, _) => 1,
            AttributeExpr::And(_, _) => 2,
            _ => 3,
        }
    }

    fn fmt_child(
        &self,
        child: &AttributeExpr,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        if child.precedence() < self.precedence() {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }
}

impl std::fmt::Display for AttributeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeExpr::Allow => f.write_str("*"),
            AttributeExpr::Deny => f.write_str("!"),
            AttributeExpr::Attribute(attr) => write!(f, "{attr}"),
            AttributeExpr::Relation(rel) => {
                write!(f, "{} {} {}", rel.attribute, rel.op, rel.value)
            }
            AttributeExpr::InSet(set) => {
                write!(f, "{{{}", set.attribute)?;
                for member in &set.members {
                    write!(f, ", {member}")?;
                }
                f.write_str("}")
            }
            AttributeExpr::And(left, right) => {
                self.fmt_child(left, f)?;
                f.write_str(" && ")?;
                self.fmt_child(right, f)
            }
            AttributeExpr::Or(left, right) => {
                self.fmt_child(left, f)?;
                f.write_str(" || ")?;
                self.fmt_child(right, f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> Attribute {
        Attribute::new(name)
    }

    #[test]
    fn relation_display() {
        let e = AttributeExpr::eq(attr("role"), ValueTerm::value("engineer"));
        assert_eq!(e.to_string(), "role = engineer");
        let e = AttributeExpr::ne(attr("status"), ValueTerm::value("retired"));
        assert_eq!(e.to_string(), "status != retired");
    }

    #[test]
    fn quoting_in_display() {
        let e = AttributeExpr::eq(attr("team name"), ValueTerm::value("blue team"));
        assert_eq!(e.to_string(), "\"team name\" = \"blue team\"");
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let e = AttributeExpr::or(
            AttributeExpr::and(
                AttributeExpr::Attribute(attr("a")),
                AttributeExpr::Attribute(attr("b")),
            ),
            AttributeExpr::Attribute(attr("c")),
        );
        assert_eq!(e.to_string(), "a && b || c");

        let e = AttributeExpr::and(
            AttributeExpr::or(
                AttributeExpr::Attribute(attr("a")),
                AttributeExpr::Attribute(attr("b")),
            ),
            AttributeExpr::Attribute(attr("c")),
        );
        assert_eq!(e.to_string(), "(a || b) && c");
    }

    #[test]
    fn set_test_display() {
        let e = AttributeExpr::InSet(SetTest {
            attribute: attr("dept"),
            members: vec![ValueTerm::value("eng"), ValueTerm::value("ops")],
        });
        assert_eq!(e.to_string(), "{dept, eng, ops}");

        let e = AttributeExpr::InSet(SetTest {
            attribute: attr("dept"),
            members: vec![],
        });
        assert_eq!(e.to_string(), "{dept}");
    }

    #[test]
    fn constants_display() {
        assert_eq!(AttributeExpr::Allow.to_string(), "*");
        assert_eq!(AttributeExpr::Deny.to_string(), "!");
    }
}

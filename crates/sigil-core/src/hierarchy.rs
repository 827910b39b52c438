//! # Value Hierarchies
//!
//! An attribute can declare a total order over its values, written
//! `clearance: public, confidential, secret` — least privileged first.
//! During evaluation, an asserted value that ranks at or above the
//! required value satisfies an equality test on that attribute.
//!
//! Values not listed in the hierarchy are unrelated to every value,
//! including themselves.

use serde::{Deserialize, Serialize};

use crate::error::SyntaxError;
use crate::values::{Attribute, ValueTerm};

/// Outcome of comparing two values under a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyOrdering {
    /// Left ranks strictly below right.
    Lt,
    /// Same rank.
    Eq,
    /// Left ranks strictly above right.
    Gt,
    /// One or both values are not in the hierarchy.
    Unrelated,
}

/// An ordered list of values for one attribute, least first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    attribute: Attribute,
    values: Vec<ValueTerm>,
}

impl Hierarchy {
    /// Build a hierarchy, validating the attribute name and value list.
    ///
    /// The name must be non-empty and contain no spaces or `:`; the
    /// value list must not repeat a value.
    pub fn new(attribute: Attribute, values: Vec<ValueTerm>) -> Result<Self, SyntaxError> {
        let name = attribute.name();
        if name.is_empty() {
            return Err(SyntaxError::new("Hierarchy name is empty"));
        }
        if name.contains(' ') {
            return Err(SyntaxError::new(format!(
                "Hierarchy name contains a space: {name}"
            )));
        }
        if name.contains(':') {
            return Err(SyntaxError::new(format!(
                "Hierarchy name contains a colon: {name}"
            )));
        }
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(SyntaxError::new(format!(
                    "Duplicate in attribute value hierarchy: {value}"
                )));
            }
        }
        Ok(Self { attribute, values })
    }

    #[must_use]
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// The ordered values, least first.
    #[must_use]
    pub fn values(&self) -> &[ValueTerm] {
        &self.values
    }

    /// Position of a value in the order, if listed.
    #[must_use]
    pub fn rank(&self, value: &ValueTerm) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Compare two values under this hierarchy.
    #[must_use]
    pub fn compare(&self, left: &ValueTerm, right: &ValueTerm) -> HierarchyOrdering {
        let (Some(l), Some(r)) = (self.rank(left), self.rank(right)) else {
            return HierarchyOrdering::Unrelated;
        };
        match l.cmp(&r) {
            std::cmp::Ordering::Less => HierarchyOrdering::Lt,
            std::cmp::Ordering::Equal => HierarchyOrdering::Eq,
            std::cmp::Ordering::Greater => HierarchyOrdering::Gt,
        }
    }
}

impl std::fmt::Display for Hierarchy {
    /// Rendered as `attr: v1, v2, v3`, parseable back into a hierarchy.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.attribute)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clearance() -> Hierarchy {
        Hierarchy::new(
            Attribute::new("clearance"),
            vec![
                ValueTerm::value("public"),
                ValueTerm::value("confidential"),
                ValueTerm::value("secret"),
            ],
        )
        .expect("valid hierarchy")
    }

    #[test]
    fn compare_follows_listed_order() {
        let h = clearance();
        assert_eq!(
            h.compare(&ValueTerm::value("public"), &ValueTerm::value("secret")),
            HierarchyOrdering::Lt
        );
        assert_eq!(
            h.compare(&ValueTerm::value("secret"), &ValueTerm::value("public")),
            HierarchyOrdering::Gt
        );
        assert_eq!(
            h.compare(
                &ValueTerm::value("confidential"),
                &ValueTerm::value("confidential")
            ),
            HierarchyOrdering::Eq
        );
    }

    #[test]
    fn unlisted_values_are_unrelated() {
        let h = clearance();
        assert_eq!(
            h.compare(&ValueTerm::value("public"), &ValueTerm::value("ultra")),
            HierarchyOrdering::Unrelated
        );
        assert_eq!(
            h.compare(&ValueTerm::value("ultra"), &ValueTerm::value("ultra")),
            HierarchyOrdering::Unrelated
        );
    }

    #[test]
    fn validation_rejects_bad_names_and_duplicates() {
        let err = Hierarchy::new(Attribute::new(""), vec![]).err().expect("err");
        assert_eq!(err.message, "Hierarchy name is empty");

        let err = Hierarchy::new(Attribute::new("a b"), vec![]).err().expect("err");
        assert_eq!(err.message, "Hierarchy name contains a space: a b");

        let err = Hierarchy::new(
            Attribute::new("clearance"),
            vec![ValueTerm::value("public"), ValueTerm::value("public")],
        )
        .err()
        .expect("err");
        assert_eq!(err.message, "Duplicate in attribute value hierarchy: public");
    }

    #[test]
    fn display_round_trip_shape() {
        assert_eq!(clearance().to_string(), "clearance: public, confidential, secret");
    }
}

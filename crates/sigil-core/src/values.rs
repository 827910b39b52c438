//! # Attributes and Attribute Values
//!
//! The vocabulary the evaluator works over:
//! - [`Attribute`] — a named property such as `role` or `clearance`.
//! - [`ValueTerm`] — a value an attribute may hold: a string or a
//!   boolean. The words `true` and `false` (any letter case) always
//!   denote the boolean terms; everything else is a string.
//! - [`AttributeValue`] — one `attribute = value` pairing.
//! - [`AttributeValueSet`] — the attributes a request carries, each
//!   with the set of values asserted for it.
//!
//! All collections are `BTreeMap`/`BTreeSet` so iteration order, and
//! therefore every rendered form, is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ValueTypeError;
use crate::tokens::word_str;

// =============================================================================
// ATTRIBUTE
// =============================================================================

/// An attribute name.
///
/// Compared and ordered case-sensitively. The name is stored exactly as
/// written; quoting is a rendering concern, handled when serializing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(String);

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&word_str(&self.0))
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// =============================================================================
// VALUE TERM
// =============================================================================

/// A value an attribute can take: a string or a boolean.
///
/// Ordering is derived (booleans before strings, `false` before `true`,
/// strings lexically) and exists only to give sets a stable iteration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueTerm {
    Boolean(bool),
    String(String),
}

impl ValueTerm {
    pub const TRUE: ValueTerm = ValueTerm::Boolean(true);
    pub const FALSE: ValueTerm = ValueTerm::Boolean(false);

    /// A string-valued term. `true` / `false` in any letter case are
    /// the boolean terms, never strings.
    #[must_use]
    pub fn value(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.eq_ignore_ascii_case("true") {
            return ValueTerm::TRUE;
        }
        if text.eq_ignore_ascii_case("false") {
            return ValueTerm::FALSE;
        }
        ValueTerm::String(text)
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, ValueTerm::String(_))
    }

    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, ValueTerm::Boolean(_))
    }

    /// The string payload.
    pub fn get_string(&self) -> Result<&str, ValueTypeError> {
        match self {
            ValueTerm::String(s) => Ok(s),
            ValueTerm::Boolean(_) => Err(ValueTypeError::NotString),
        }
    }

    /// The boolean payload.
    pub fn get_boolean(&self) -> Result<bool, ValueTypeError> {
        match self {
            ValueTerm::Boolean(b) => Ok(*b),
            ValueTerm::String(_) => Err(ValueTypeError::NotBoolean),
        }
    }

    /// Render as label syntax: bare word where legal, quoted otherwise.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            ValueTerm::Boolean(true) => "true".to_string(),
            ValueTerm::Boolean(false) => "false".to_string(),
            ValueTerm::String(s) => word_str(s),
        }
    }
}

impl std::fmt::Display for ValueTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_string())
    }
}

// =============================================================================
// ATTRIBUTE / VALUE PAIR
// =============================================================================

/// One `attribute = value` pairing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeValue {
    pub attribute: Attribute,
    pub value: ValueTerm,
}

impl AttributeValue {
    #[must_use]
    pub fn new(attribute: Attribute, value: ValueTerm) -> Self {
        Self { attribute, value }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.attribute, self.value)
    }
}

// =============================================================================
// ATTRIBUTE VALUE SET
// =============================================================================

/// The attribute values a request asserts.
///
/// An attribute may carry several values; membership checks are exact
/// on (attribute, value). Empty sets per attribute never occur: an
/// attribute is either absent or has at least one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValueSet {
    values: BTreeMap<Attribute, BTreeSet<ValueTerm>>,
}

impl AttributeValueSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: Attribute, value: ValueTerm) {
        self.values.entry(attribute).or_default().insert(value);
    }

    /// Whether any values are present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the attribute is present with any value.
    #[must_use]
    pub fn has_attribute(&self, attribute: &Attribute) -> bool {
        self.values.contains_key(attribute)
    }

    /// Whether the exact (attribute, value) pair is asserted.
    #[must_use]
    pub fn contains(&self, attribute: &Attribute, value: &ValueTerm) -> bool {
        self.values
            .get(attribute)
            .is_some_and(|set| set.contains(value))
    }

    /// The values asserted for an attribute, if present.
    #[must_use]
    pub fn get(&self, attribute: &Attribute) -> Option<&BTreeSet<ValueTerm>> {
        self.values.get(attribute)
    }

    /// Attributes present in the set, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.values.keys()
    }

    /// All (attribute, value) pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &ValueTerm)> {
        self.values
            .iter()
            .flat_map(|(attr, set)| set.iter().map(move |v| (attr, v)))
    }
}

impl FromIterator<AttributeValue> for AttributeValueSet {
    fn from_iter<I: IntoIterator<Item = AttributeValue>>(iter: I) -> Self {
        let mut set = Self::new();
        for av in iter {
            set.insert(av.attribute, av.value);
        }
        set
    }
}

impl std::fmt::Display for AttributeValueSet {
    /// Rendered as `a = v, b = w`, sorted, parseable as a value list.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (attr, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{attr} = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_false_are_booleans_any_case() {
        assert_eq!(ValueTerm::value("true"), ValueTerm::TRUE);
        assert_eq!(ValueTerm::value("TRUE"), ValueTerm::TRUE);
        assert_eq!(ValueTerm::value("False"), ValueTerm::FALSE);
        assert_eq!(
            ValueTerm::value("truthy"),
            ValueTerm::String("truthy".to_string())
        );
    }

    #[test]
    fn accessors_enforce_tags() {
        assert_eq!(ValueTerm::value("engineer").get_string(), Ok("engineer"));
        assert_eq!(
            ValueTerm::TRUE.get_string(),
            Err(ValueTypeError::NotString)
        );
        assert_eq!(ValueTerm::TRUE.get_boolean(), Ok(true));
        assert_eq!(
            ValueTerm::value("engineer").get_boolean(),
            Err(ValueTypeError::NotBoolean)
        );
    }

    #[test]
    fn rendering_quotes_non_words() {
        assert_eq!(ValueTerm::value("engineer").as_string(), "engineer");
        assert_eq!(ValueTerm::value("two words").as_string(), "\"two words\"");
        assert_eq!(ValueTerm::TRUE.as_string(), "true");
        assert_eq!(Attribute::new("my attr").to_string(), "\"my attr\"");
    }

    #[test]
    fn set_membership_is_exact() {
        let mut set = AttributeValueSet::new();
        set.insert(Attribute::new("role"), ValueTerm::value("engineer"));
        set.insert(Attribute::new("role"), ValueTerm::value("admin"));
        assert!(set.contains(&Attribute::new("role"), &ValueTerm::value("admin")));
        assert!(!set.contains(&Attribute::new("role"), &ValueTerm::value("sales")));
        assert!(set.has_attribute(&Attribute::new("role")));
        assert!(!set.has_attribute(&Attribute::new("dept")));
    }

    #[test]
    fn display_is_sorted_and_parseable_shape() {
        let set: AttributeValueSet = [
            AttributeValue::new(Attribute::new("z"), ValueTerm::value("1")),
            AttributeValue::new(Attribute::new("a"), ValueTerm::value("2")),
            AttributeValue::new(Attribute::new("a"), ValueTerm::value("1")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.to_string(), "a = 1, a = 2, z = 1");
    }
}

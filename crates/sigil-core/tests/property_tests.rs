//! Property-based tests for the label engine.
//!
//! Uses proptest to verify structural invariants:
//! - quoting then tokenizing any string is the identity
//! - blank-node label transport encoding round-trips
//! - serializing a parsed expression re-parses to an equal expression
//! - the trie node table assigns distinct, stable identifiers and its
//!   iterator reconstructs exactly the inserted terms

use std::collections::BTreeSet;

use proptest::prelude::*;

use sigil_core::{
    AttributeExpr, Relation, SequentialIdGenerator, SetTest, SimpleTermFactory, Term, TermId,
    Tokenizer, TrieNodeMap, ValueTerm, decode_label, encode_label, parse_expr,
    tokens::quoted_str,
};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Attribute names: bare words that are not the boolean keywords.
fn attr_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}".prop_filter("keywords are not attribute names", |s| {
        s != "true" && s != "false"
    })
}

fn value_term() -> impl Strategy<Value = ValueTerm> {
    prop_oneof![
        Just(ValueTerm::TRUE),
        Just(ValueTerm::FALSE),
        "[a-z][a-z0-9_]{0,7}".prop_map(ValueTerm::value),
    ]
}

fn leaf_expr() -> impl Strategy<Value = AttributeExpr> {
    prop_oneof![
        attr_name().prop_map(|name| AttributeExpr::Attribute(name.as_str().into())),
        (attr_name(), value_term())
            .prop_map(|(name, value)| AttributeExpr::eq(name.as_str().into(), value)),
        (attr_name(), value_term())
            .prop_map(|(name, value)| AttributeExpr::ne(name.as_str().into(), value)),
        (attr_name(), proptest::collection::vec(value_term(), 0..4)).prop_map(
            |(name, members)| AttributeExpr::InSet(SetTest {
                attribute: name.as_str().into(),
                members,
            })
        ),
    ]
}

fn label_expr() -> impl Strategy<Value = AttributeExpr> {
    leaf_expr().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| AttributeExpr::and(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| AttributeExpr::or(l, r)),
        ]
    })
}

fn term() -> impl Strategy<Value = Term> {
    let text = "[a-zA-Z0-9:/#._-]{0,24}";
    prop_oneof![
        text.prop_map(Term::uri),
        (text, "[a-z:#]{1,12}").prop_map(|(lexical, datatype)| Term::literal(lexical, datatype)),
        (text, "[a-z:#]{1,12}", "[a-z]{2}")
            .prop_map(|(lexical, datatype, lang)| Term::lang_literal(lexical, datatype, lang)),
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Any string, quoted, lexes back to a single token with the
    /// original value after escape processing.
    #[test]
    fn quoted_string_tokenizes_to_itself(s in ".*") {
        let quoted = quoted_str(&s);
        let mut tokenizer = Tokenizer::new(&quoted);
        let token = tokenizer.next_token().expect("one token");
        prop_assert!(token.is_string());
        prop_assert_eq!(token.image(), s.as_str());
        prop_assert!(!tokenizer.has_next().expect("end"));
    }

    /// Transport encoding of blank-node labels is lossless.
    #[test]
    fn label_encoding_round_trips(label in ".*") {
        let encoded = encode_label(&label);
        prop_assert_eq!(decode_label(&encoded).expect("decode"), label);
    }

    /// Canonical serialization re-parses to an equal expression, and is
    /// a fixpoint.
    #[test]
    fn expression_serialization_round_trips(expr in label_expr()) {
        let text = expr.to_string();
        let reparsed = parse_expr(&text).expect("canonical text parses");
        prop_assert_eq!(&reparsed, &expr);
        prop_assert_eq!(reparsed.to_string(), text);
    }

    /// Distinct terms get distinct identifiers; repeated insertion is
    /// stable; iteration reconstructs exactly what was inserted.
    #[test]
    fn node_table_identifiers_are_stable(terms in proptest::collection::vec(term(), 1..32)) {
        let mut table = TrieNodeMap::<SequentialIdGenerator>::default();
        let mut assigned: Vec<(Term, TermId)> = Vec::new();
        for t in &terms {
            let id = table.add(t).expect("add");
            assigned.push((t.clone(), id));
        }
        // Re-adding never changes an assignment.
        for (t, id) in &assigned {
            prop_assert_eq!(table.add(t).expect("re-add"), *id);
        }
        // Identifier equality must track term equality.
        for (a, ida) in &assigned {
            for (b, idb) in &assigned {
                prop_assert_eq!(a == b, ida == idb);
            }
        }
        let expected: BTreeSet<(Term, TermId)> = assigned.into_iter().collect();
        let seen: BTreeSet<(Term, TermId)> = table.terms(&SimpleTermFactory).collect();
        prop_assert_eq!(seen, expected);
    }

    /// Relation text in any spacing parses to the same expression.
    #[test]
    fn whitespace_is_insignificant(name in attr_name(), value in "[a-z]{1,8}") {
        let tight = format!("{name}={value}");
        let spaced = format!("  {name}  =  {value}  ");
        let a = parse_expr(&tight).expect("parse");
        let b = parse_expr(&spaced).expect("parse");
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, AttributeExpr::Relation(Relation {
            attribute: name.as_str().into(),
            op: sigil_core::Operator::Eq,
            value: ValueTerm::value(value),
        }));
    }
}

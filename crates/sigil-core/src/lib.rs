//! # sigil-core
//!
//! The deterministic ABAC label engine for Sigil - THE LOGIC.
//!
//! This crate implements attribute-based access control for
//! graph-structured data: a small expression language describing who
//! may see a labelled data item, the tokenizer/parser/evaluator for
//! that language, and a trie-based node table interning the graph
//! terms that labels reference.
//!
//! ## Usage Shape
//!
//! Labels are compiled once and evaluated many times: parse to an
//! immutable [`AttributeExpr`], then evaluate it per request against a
//! requester's [`AttributeValueSet`] (plus any registered
//! [`Hierarchy`] values). A compiled expression is safe to share and
//! evaluate concurrently.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure Rust: no async, no network dependencies
//! - Is deterministic: `BTreeMap` only, no floats, no ambient
//!   randomness (the blank-node allocator takes its seed from the
//!   caller)
//! - Is minimal: if a feature is not essential to label parsing,
//!   evaluation, or term interning, it is removed
//! - Treats the graph data model as an external collaborator, reached
//!   only through the [`GraphTerm`] / [`TermFactory`] seams

// =============================================================================
// MODULES
// =============================================================================

pub mod api;
pub mod error;
pub mod eval;
pub mod expr;
pub mod hierarchy;
pub mod label_alloc;
pub mod node_table;
pub mod parse;
pub mod store;
pub mod term;
pub mod tokens;
pub mod values;

// =============================================================================
// RE-EXPORTS: Values and Expressions
// =============================================================================

pub use error::{LabelError, NodeTableError, SyntaxError, ValueTypeError};
pub use expr::{AttributeExpr, Operator, Relation, SetTest};
pub use hierarchy::{Hierarchy, HierarchyOrdering};
pub use values::{Attribute, AttributeValue, AttributeValueSet, ValueTerm};

// =============================================================================
// RE-EXPORTS: Parsing and Evaluation
// =============================================================================

pub use eval::{EvalContext, RequestContext, eval};
pub use parse::{
    parse_attr_value, parse_attr_value_list, parse_expr, parse_expr_list, parse_hierarchy,
    parse_value_term_list,
};
pub use store::{AttributesStore, LocalAttributesStore};
pub use tokens::{StringKind, Token, TokenKind, Tokenizer};

// =============================================================================
// RE-EXPORTS: Terms and the Node Table
// =============================================================================

pub use label_alloc::{BlankNodeAllocator, decode_label, encode_label};
pub use node_table::{IdGenerator, SequentialIdGenerator, TermId, TrieNodeMap};
pub use term::{GraphTerm, SimpleTermFactory, Term, TermFactory};

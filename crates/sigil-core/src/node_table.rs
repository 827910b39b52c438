//! # Trie Node Table
//!
//! Append-only, prefix-compressed map from graph terms to numeric
//! identifiers. URIs key on their URI string, literals on their lexical
//! form; the datatype/language discrimination lives in per-node leaf
//! tables so that `"42"` the string, `"42"` the integer and
//! `<http://example/42>` all receive distinct identifiers while
//! sharing the stored text.
//!
//! Interior nodes live in an arena and refer to each other by index,
//! so the single-writer discipline is enforced by ownership: only the
//! holder of `&mut TrieNodeMap` can mutate, and shared references allow
//! unrestricted concurrent reads once ingestion is done.
//!
//! Node invariant: at any interior node, no two edge labels share a
//! non-empty common prefix. Every insertion preserves this by splitting
//! an edge when the new key diverges partway along it.

use std::collections::BTreeMap;

use crate::error::NodeTableError;
use crate::term::{GraphTerm, TermFactory};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier assigned to an interned term. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub u64);

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh identifiers, injected into the table.
///
/// Must never issue the same identifier twice.
pub trait IdGenerator {
    /// A fresh identifier, or a description of why none could be made.
    fn next_id(&mut self) -> Result<TermId, String>;
}

/// Monotonic counter generator, starting at zero.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> Result<TermId, String> {
        let id = TermId(self.next);
        self.next += 1;
        Ok(id)
    }
}

// =============================================================================
// TRIE STRUCTURE
// =============================================================================

/// Discriminates terms whose trie key is the same text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LeafKind {
    Uri,
    Literal {
        datatype: String,
        language: Option<String>,
    },
}

/// Arena index of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRef(usize);

#[derive(Debug, Default)]
struct Interior {
    /// `(edge label, child)`, sorted by label. Labels are prefix-free.
    edges: Vec<(String, NodeRef)>,
    /// Terms ending at this node.
    leaves: BTreeMap<LeafKind, TermId>,
}

/// The node table. Generic over the identifier source.
#[derive(Debug)]
pub struct TrieNodeMap<G: IdGenerator> {
    arena: Vec<Interior>,
    generator: G,
    len: usize,
}

const ROOT: NodeRef = NodeRef(0);

/// What one descent step decided to do, computed before mutating so the
/// arena borrow stays simple.
enum Step {
    /// Follow edge `child`, consuming `matched` bytes of the suffix.
    Descend { child: NodeRef, matched: usize },
    /// Split edge `index` after `matched` bytes.
    Split { index: usize, matched: usize },
    /// No edge shares a prefix; add one for the whole suffix.
    NewEdge,
}

impl<G: IdGenerator> TrieNodeMap<G> {
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self {
            arena: vec![Interior::default()],
            generator,
            len: 0,
        }
    }

    /// Number of distinct terms interned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Intern a term, assigning a fresh identifier on first sight and
    /// returning the existing one on re-insertion.
    pub fn add<T: GraphTerm>(&mut self, term: &T) -> Result<TermId, NodeTableError> {
        let leaf = leaf_kind(term)?;
        let node = self.descend_to(term.lexical_form());
        if let Some(id) = self.arena[node.0].leaves.get(&leaf) {
            return Ok(*id);
        }
        let id = self
            .generator
            .next_id()
            .map_err(NodeTableError::IdGenerator)?;
        self.arena[node.0].leaves.insert(leaf, id);
        self.len += 1;
        Ok(id)
    }

    /// Look up a term without interning it.
    pub fn get<T: GraphTerm>(&self, term: &T) -> Result<Option<TermId>, NodeTableError> {
        let leaf = leaf_kind(term)?;
        let mut node = ROOT;
        let mut suffix = term.lexical_form();
        while !suffix.is_empty() {
            let mut followed = None;
            for (label, child) in &self.arena[node.0].edges {
                if let Some(rest) = suffix.strip_prefix(label.as_str()) {
                    followed = Some((*child, rest));
                    break;
                }
            }
            let Some((child, rest)) = followed else {
                return Ok(None);
            };
            node = child;
            suffix = rest;
        }
        Ok(self.arena[node.0].leaves.get(&leaf).copied())
    }

    /// Walk to the node for `key`, creating and splitting as needed.
    fn descend_to(&mut self, key: &str) -> NodeRef {
        let mut node = ROOT;
        let mut offset = 0;
        while offset < key.len() {
            let suffix = &key[offset..];
            let step = self.plan_step(node, suffix);
            match step {
                Step::Descend { child, matched } => {
                    node = child;
                    offset += matched;
                }
                Step::Split { index, matched } => {
                    node = self.split_edge(node, index, matched);
                    offset += matched;
                }
                Step::NewEdge => {
                    node = self.new_edge(node, suffix);
                    offset = key.len();
                }
            }
        }
        node
    }

    fn plan_step(&self, node: NodeRef, suffix: &str) -> Step {
        // The prefix-free invariant means at most one edge can share a
        // non-empty prefix with the suffix.
        for (index, (label, child)) in self.arena[node.0].edges.iter().enumerate() {
            let matched = common_prefix_bytes(label, suffix);
            if matched == 0 {
                continue;
            }
            if matched == label.len() {
                return Step::Descend {
                    child: *child,
                    matched,
                };
            }
            return Step::Split { index, matched };
        }
        Step::NewEdge
    }

    /// Insert an intermediate node carrying the first `matched` bytes
    /// of the edge label; the original child keeps the remainder.
    fn split_edge(&mut self, node: NodeRef, index: usize, matched: usize) -> NodeRef {
        let mid = NodeRef(self.arena.len());
        self.arena.push(Interior::default());
        let (label, child) = self.arena[node.0].edges[index].clone();
        let (shared, remainder) = label.split_at(matched);
        self.arena[mid.0].edges.push((remainder.to_string(), child));
        self.arena[node.0].edges[index] = (shared.to_string(), mid);
        mid
    }

    fn new_edge(&mut self, node: NodeRef, suffix: &str) -> NodeRef {
        let child = NodeRef(self.arena.len());
        self.arena.push(Interior::default());
        let edges = &mut self.arena[node.0].edges;
        let position = edges
            .binary_search_by(|(label, _)| label.as_str().cmp(suffix))
            .unwrap_or_else(|p| p);
        edges.insert(position, (suffix.to_string(), child));
        child
    }

    /// Reconstruct every stored `(term, identifier)` pair, exactly
    /// once, in trie edge order.
    pub fn terms<F: TermFactory>(&self, factory: &F) -> impl Iterator<Item = (F::Term, TermId)> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_terms(ROOT, &mut String::new(), factory, &mut out);
        out.into_iter()
    }

    fn collect_terms<F: TermFactory>(
        &self,
        node: NodeRef,
        prefix: &mut String,
        factory: &F,
        out: &mut Vec<(F::Term, TermId)>,
    ) {
        let interior = &self.arena[node.0];
        for (leaf, id) in &interior.leaves {
            let term = match leaf {
                LeafKind::Uri => factory.uri(prefix),
                LeafKind::Literal { datatype, language } => {
                    factory.literal(prefix, datatype, language.as_deref())
                }
            };
            out.push((term, *id));
        }
        for (label, child) in &interior.edges {
            prefix.push_str(label);
            self.collect_terms(*child, prefix, factory, out);
            prefix.truncate(prefix.len() - label.len());
        }
    }
}

impl<G: IdGenerator + Default> Default for TrieNodeMap<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

fn leaf_kind<T: GraphTerm>(term: &T) -> Result<LeafKind, NodeTableError> {
    if term.is_uri() {
        return Ok(LeafKind::Uri);
    }
    if term.is_literal() {
        return Ok(LeafKind::Literal {
            datatype: term.datatype().unwrap_or_default().to_string(),
            language: term.language().map(str::to_string),
        });
    }
    Err(NodeTableError::UnsupportedTerm(
        term.lexical_form().to_string(),
    ))
}

/// Byte length of the longest common prefix, aligned to character
/// boundaries so splits never land inside a multi-byte sequence.
fn common_prefix_bytes(a: &str, b: &str) -> usize {
    let mut matched = 0;
    let mut bi = b.char_indices();
    for (offset, ca) in a.char_indices() {
        match bi.next() {
            Some((_, cb)) if ca == cb => matched = offset + ca.len_utf8(),
            _ => break,
        }
    }
    matched
}

// =============================================================================
// TESTS
// =============================================================================

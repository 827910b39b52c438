//! # Graph Terms
//!
//! The engine treats the graph data model as an external collaborator:
//! everything it needs from a term goes through [`GraphTerm`], and
//! every term it builds goes through a [`TermFactory`]. Hosts with
//! their own term representation implement both; [`Term`] and
//! [`SimpleTermFactory`] are the self-contained implementations used
//! by the tools and tests.

use serde::{Deserialize, Serialize};

/// Read access to a graph term.
///
/// Blank nodes report neither URI nor literal; the node table rejects
/// them as unsupported.
pub trait GraphTerm {
    fn is_uri(&self) -> bool;

    fn is_literal(&self) -> bool;

    /// The URI string for URIs, the lexical form for literals, the
    /// label for blank nodes.
    fn lexical_form(&self) -> &str;

    /// Datatype URI, for literals.
    fn datatype(&self) -> Option<&str>;

    /// Language tag, for language-tagged literals.
    fn language(&self) -> Option<&str>;
}

/// Term construction, used when reconstructing terms from the node
/// table and when allocating blank nodes from labels.
pub trait TermFactory {
    type Term: GraphTerm;

    fn uri(&self, uri: &str) -> Self::Term;

    fn literal(&self, lexical: &str, datatype: &str, language: Option<&str>) -> Self::Term;

    fn blank_node(&self, label: &str) -> Self::Term;
}

// =============================================================================
// SELF-CONTAINED TERM
// =============================================================================

/// The default term representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Uri(String),
    Literal {
        lexical: String,
        datatype: String,
        language: Option<String>,
    },
    Blank(String),
}

impl Term {
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Term::Uri(uri.into())
    }

    #[must_use]
    pub fn literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    #[must_use]
    pub fn lang_literal(
        lexical: impl Into<String>,
        datatype: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: Some(language.into()),
        }
    }

    #[must_use]
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }
}

impl GraphTerm for Term {
    fn is_uri(&self) -> bool {
        matches!(self, Term::Uri(_))
    }

    fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    fn lexical_form(&self) -> &str {
        match self {
            Term::Uri(uri) => uri,
            Term::Literal { lexical, .. } => lexical,
            Term::Blank(label) => label,
        }
    }

    fn datatype(&self) -> Option<&str> {
        match self {
            Term::Literal { datatype, .. } => Some(datatype),
            _ => None,
        }
    }

    fn language(&self) -> Option<&str> {
        match self {
            Term::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Uri(uri) => write!(f, "<{uri}>"),
            Term::Literal {
                lexical,
                datatype,
                language: Some(lang),
            } => write!(f, "\"{lexical}\"@{lang}^^<{datatype}>"),
            Term::Literal {
                lexical, datatype, ..
            } => write!(f, "\"{lexical}\"^^<{datatype}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// Factory producing [`Term`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTermFactory;

impl TermFactory for SimpleTermFactory {
    type Term = Term;

    fn uri(&self, uri: &str) -> Term {
        Term::uri(uri)
    }

    fn literal(&self, lexical: &str, datatype: &str, language: Option<&str>) -> Term {
        Term::Literal {
            lexical: lexical.to_string(),
            datatype: datatype.to_string(),
            language: language.map(str::to_string),
        }
    }

    fn blank_node(&self, label: &str) -> Term {
        Term::blank(label)
    }
}

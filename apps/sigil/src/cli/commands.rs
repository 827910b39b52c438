//! # CLI Command Implementations
//!
//! Each command loads what it needs, calls into sigil-core, and prints
//! either human-readable text or JSON (`--json-mode`).
//!
//! ## Attribute store format
//!
//! The store is a TOML file mapping users to attribute lists and
//! attributes to hierarchy declarations, both in label syntax:
//!
//! ```toml
//! [users]
//! alice = "role=engineer, clearance=secret, oncall"
//! bob   = "role=analyst, clearance=confidential"
//!
//! [hierarchies]
//! clearance = "clearance: public, confidential, secret"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use sigil_core::{
    AttributesStore, Hierarchy, LocalAttributesStore, SyntaxError, ValueTerm, parse_expr,
    parse_hierarchy,
};

// =============================================================================
// ERRORS
// =============================================================================

/// Failures surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad attribute store {path}: {message}")]
    Store { path: PathBuf, message: String },

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("{0}")]
    Usage(String),
}

// =============================================================================
// ATTRIBUTE STORE LOADING
// =============================================================================

/// On-disk shape of the attribute store.
#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    users: BTreeMap<String, String>,
    #[serde(default)]
    hierarchies: BTreeMap<String, String>,
}

fn load_store(path: &Path) -> Result<LocalAttributesStore, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: StoreFile = toml::from_str(&text).map_err(|e| AppError::Store {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut store = LocalAttributesStore::new();
    for (user, attributes) in &file.users {
        store
            .parse_attributes(user, attributes)
            .map_err(|e| AppError::Store {
                path: path.to_path_buf(),
                message: format!("user {user}: {e}"),
            })?;
    }
    for (key, declaration) in &file.hierarchies {
        let hierarchy: Hierarchy = parse_hierarchy(declaration).map_err(|e| AppError::Store {
            path: path.to_path_buf(),
            message: format!("hierarchy {key}: {e}"),
        })?;
        if hierarchy.attribute().name() != key {
            warn!(
                key = key.as_str(),
                attribute = hierarchy.attribute().name(),
                "hierarchy key does not match declared attribute"
            );
        }
        store.put_hierarchy(hierarchy);
    }
    debug!(
        users = store.users().count(),
        hierarchies = store.hierarchies().count(),
        "attribute store loaded"
    );
    Ok(store)
}

fn load_store_or_empty(path: Option<&Path>) -> Result<LocalAttributesStore, AppError> {
    match path {
        Some(path) => load_store(path),
        None => Ok(LocalAttributesStore::new()),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// `sigil parse` - parse labels and print canonical forms.
pub fn cmd_parse(json_mode: bool, labels: &[String]) -> Result<(), AppError> {
    let mut parsed = Vec::with_capacity(labels.len());
    for label in labels {
        let expr = parse_expr(label)?;
        parsed.push((label, expr.to_string()));
    }

    if json_mode {
        let out: Vec<_> = parsed
            .iter()
            .map(|(label, canonical)| {
                serde_json::json!({ "label": label, "canonical": canonical })
            })
            .collect();
        println!("{}", render_json(&out));
    } else {
        for (_, canonical) in &parsed {
            println!("{canonical}");
        }
    }
    Ok(())
}

/// `sigil eval` - evaluate a label for a user or inline attributes.
pub fn cmd_eval(
    store_path: Option<&Path>,
    json_mode: bool,
    label: &str,
    user: Option<&str>,
    attributes: Option<&str>,
    hierarchies: &[String],
) -> Result<(), AppError> {
    const INLINE_USER: &str = "<inline>";

    let expr = parse_expr(label)?;
    let mut store = load_store_or_empty(store_path)?;
    for declaration in hierarchies {
        store.put_hierarchy(parse_hierarchy(declaration)?);
    }

    let subject = match (user, attributes) {
        (Some(user), None) => {
            if store_path.is_none() {
                return Err(AppError::Usage(
                    "--user requires an attribute store (--store)".to_string(),
                ));
            }
            if store.attributes(user).is_none() {
                return Err(AppError::UnknownUser(user.to_string()));
            }
            user.to_string()
        }
        (None, Some(attributes)) => {
            store.parse_attributes(INLINE_USER, attributes)?;
            INLINE_USER.to_string()
        }
        _ => {
            return Err(AppError::Usage(
                "exactly one of --user or --attributes is required".to_string(),
            ));
        }
    };

    let allowed = store.evaluate(&subject, &expr) == ValueTerm::TRUE;

    if json_mode {
        let out = serde_json::json!({
            "label": expr.to_string(),
            "subject": subject,
            "allowed": allowed,
        });
        println!("{}", render_json(&out));
    } else {
        println!("{}", if allowed { "ALLOW" } else { "DENY" });
    }
    Ok(())
}

/// `sigil hierarchy` - validate a hierarchy declaration.
pub fn cmd_hierarchy(json_mode: bool, text: &str) -> Result<(), AppError> {
    let hierarchy = parse_hierarchy(text)?;

    if json_mode {
        let values: Vec<String> = hierarchy.values().iter().map(ValueTerm::as_string).collect();
        let out = serde_json::json!({
            "attribute": hierarchy.attribute().name(),
            "values": values,
        });
        println!("{}", render_json(&out));
    } else {
        println!("{hierarchy}");
        println!("{} values, least rank first", hierarchy.values().len());
    }
    Ok(())
}

/// `sigil users` - list the users in the attribute store.
pub fn cmd_users(store_path: Option<&Path>, json_mode: bool) -> Result<(), AppError> {
    let Some(path) = store_path else {
        return Err(AppError::Usage(
            "users requires an attribute store (--store)".to_string(),
        ));
    };
    let store = load_store(path)?;

    if json_mode {
        let out: Vec<_> = store
            .users()
            .map(|user| {
                let attributes = store
                    .attributes(user)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                serde_json::json!({ "user": user, "attributes": attributes })
            })
            .collect();
        println!("{}", render_json(&out));
    } else {
        for user in store.users() {
            match store.attributes(user) {
                Some(attributes) => println!("{user}: {attributes}"),
                None => println!("{user}"),
            }
        }
    }
    Ok(())
}

/// Pretty JSON, falling back to the debug form if serialization fails
/// (which `serde_json::Value` never does in practice).
fn render_json<T: serde::Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_file_parses() {
        let text = r#"
            [users]
            alice = "role=engineer, clearance=secret"

            [hierarchies]
            clearance = "clearance: public, confidential, secret"
        "#;
        let file: StoreFile = toml::from_str(text).expect("toml");
        assert_eq!(file.users.len(), 1);
        assert_eq!(file.hierarchies.len(), 1);
    }

    #[test]
    fn inline_eval_requires_one_subject() {
        let err = cmd_eval(None, false, "a", None, None, &[])
            .err()
            .expect("error");
        assert!(matches!(err, AppError::Usage(_)));
    }

    #[test]
    fn inline_eval_decides() {
        cmd_eval(
            None,
            true,
            "role = engineer",
            None,
            Some("role=engineer"),
            &[],
        )
        .expect("eval");
    }
}

//! # Request Envelopes
//!
//! Builds the XML request documents the repository accepts on its root
//! resource, and the raw-body store request.
//!
//! ```text
//! <exist:request xmlns:exist="http://exist.sourceforge.net/NS/exist">
//!   <exist:query>//SPEECH[SPEAKER='HAMLET']</exist:query>
//!   <exist:display indent="true" howmany="15" start="1"/>
//! </exist:request>
//! ```
//!
//! Only query text is escaped. Document and collection identifiers are
//! substituted verbatim, so an identifier containing `"`, `<` or `&`
//! produces a malformed request.

use anyhow::Result;
use bytes::Bytes;
use reqwest::Method;
use std::fmt;
use std::path::Path;

use super::escape::escape;
use crate::repl::session::DisplayMode;

/// Namespace of every envelope element
pub const EXIST_NS: &str = "http://exist.sourceforge.net/NS/exist";

/// One outbound operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEnvelope {
    Query {
        text: String,
        mode: DisplayMode,
        result_window: u32,
        start: u32,
        indent: bool,
    },
    Get {
        document: String,
        collection: Option<String>,
        indent: bool,
    },
    Remove {
        document: String,
    },
    /// Document bytes sent unchanged; `target` is the resource path.
    Store {
        body: Bytes,
        target: String,
    },
    /// A complete request body read from a file, posted as-is.
    Raw {
        body: Bytes,
    },
}

pub fn build_query(
    text: &str,
    display_all: bool,
    result_window: u32,
    start: u32,
    indent: bool,
) -> RequestEnvelope {
    RequestEnvelope::Query {
        text: text.to_string(),
        mode: DisplayMode::from_display_all(display_all),
        result_window,
        start,
        indent,
    }
}

pub fn build_get(document: &str, collection: Option<&str>, indent: bool) -> RequestEnvelope {
    RequestEnvelope::Get {
        document: document.to_string(),
        collection: collection.map(str::to_string),
        indent,
    }
}

pub fn build_remove(document: &str) -> RequestEnvelope {
    RequestEnvelope::Remove {
        document: document.to_string(),
    }
}

pub fn build_store(body: impl Into<Bytes>, target: &str) -> RequestEnvelope {
    RequestEnvelope::Store {
        body: body.into(),
        target: target.to_string(),
    }
}

pub fn build_raw(body: impl Into<Bytes>) -> RequestEnvelope {
    RequestEnvelope::Raw { body: body.into() }
}

/// Derive the repository path a local file is stored under:
/// its base name, below `collection` when one is given.
pub fn store_target(local_path: &str, collection: Option<&str>) -> Result<String> {
    let name = Path::new(local_path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("cannot derive a document name from '{local_path}'"))?;

    Ok(match collection.map(|c| c.trim_end_matches('/')) {
        Some(collection) if !collection.is_empty() => format!("{collection}/{name}"),
        _ => name.to_string(),
    })
}

fn wrap(inner: &str) -> String {
    format!("<exist:request xmlns:exist=\"{EXIST_NS}\">{inner}</exist:request>")
}

impl RequestEnvelope {
    pub fn method(&self) -> Method {
        match self {
            RequestEnvelope::Store { .. } => Method::PUT,
            _ => Method::POST,
        }
    }

    /// Resource path relative to the repository root
    pub fn path(&self) -> String {
        match self {
            RequestEnvelope::Store { target, .. } => {
                format!("/{}", target.trim_start_matches('/'))
            }
            _ => "/".to_string(),
        }
    }

    /// The XML document for query, get and remove requests
    pub fn xml(&self) -> Option<String> {
        match self {
            RequestEnvelope::Query {
                text,
                mode,
                result_window,
                start,
                indent,
            } => Some(wrap(&format!(
                "<exist:query>{}</exist:query><exist:{} indent=\"{indent}\" howmany=\"{result_window}\" start=\"{start}\"/>",
                escape(text),
                mode.element(),
            ))),
            RequestEnvelope::Get {
                document,
                collection,
                indent,
            } => {
                let id = collection
                    .as_deref()
                    .map(|c| format!(" id=\"{c}\""))
                    .unwrap_or_default();
                Some(wrap(&format!(
                    "<exist:display indent=\"{indent}\"/><exist:get document=\"{document}\"{id}/>"
                )))
            }
            RequestEnvelope::Remove { document } => {
                Some(wrap(&format!("<exist:remove document=\"{document}\"/>")))
            }
            RequestEnvelope::Store { .. } | RequestEnvelope::Raw { .. } => None,
        }
    }

    pub fn body(&self) -> Bytes {
        match self {
            RequestEnvelope::Store { body, .. } | RequestEnvelope::Raw { body } => body.clone(),
            _ => Bytes::from(self.xml().unwrap_or_default()),
        }
    }
}

impl fmt::Display for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.xml() {
            Some(xml) => f.write_str(&xml),
            None => write!(
                f,
                "{} {} ({} bytes)",
                self.method(),
                self.path(),
                self.body().len()
            ),
        }
    }
}

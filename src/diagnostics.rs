//! The diagnostic channel every view state carries.
//!
//! Failures that do not stop a view from rendering (a skipped evolution stage,
//! a failed entry in a catalog batch) are recorded here as well as logged
//! through `tracing`, so callers can inspect exactly what went wrong.

use crate::entry::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Which fetch a diagnostic belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticScope {
    /// The catalog index listing.
    Index,
    /// A catalog index item, by name, whose detail could not be loaded.
    CatalogItem { position: usize, name: String },
    /// The root entry of a detail view.
    Entry(EntryId),
    /// Species metadata of an entry.
    Species(EntryId),
    /// The evolution chain resource of an entry.
    EvolutionChain(EntryId),
    /// A single stage of an evolution chain, by species name.
    EvolutionStage(String),
}

impl fmt::Display for DiagnosticScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticScope::Index => write!(f, "index"),
            DiagnosticScope::CatalogItem { position, name } => {
                write!(f, "catalog item {} ({})", position + 1, name)
            }
            DiagnosticScope::Entry(id) => write!(f, "entry {}", id),
            DiagnosticScope::Species(id) => write!(f, "species of entry {}", id),
            DiagnosticScope::EvolutionChain(id) => write!(f, "evolution chain of entry {}", id),
            DiagnosticScope::EvolutionStage(name) => write!(f, "evolution stage {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub scope: DiagnosticScope,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a failure through `tracing` and keep it.
    pub fn record(&mut self, scope: DiagnosticScope, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            scope,
            message: message.into(),
        };
        warn!(scope = %diagnostic.scope, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Keep an already logged diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: DiagnosticLog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "  (no diagnostics)");
        }
        for diagnostic in &self.entries {
            writeln!(f, "  {}", diagnostic)?;
        }
        Ok(())
    }
}

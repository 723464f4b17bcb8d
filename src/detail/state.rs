use super::loader::{DetailOutcome, DetailPage};
use crate::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticScope};
use crate::entry::EntryId;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    Idle,
    Loading,
    /// Terminal: the requested entry does not exist or could not be fetched.
    NotFound,
    Ready(Box<DetailPage>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailEvent {
    /// Navigation to an entry. Bumps the generation.
    Requested(EntryId),
    /// The load tagged `generation` finished.
    Loaded {
        generation: u64,
        outcome: DetailOutcome,
    },
    ShinyToggled(bool),
}

/// Immutable snapshot of the detail view, advanced by [`DetailState::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    generation: u64,
    id: Option<EntryId>,
    phase: DetailPhase,
    show_shiny: bool,
    diagnostics: DiagnosticLog,
}

impl Default for DetailState {
    fn default() -> Self {
        Self {
            generation: 0,
            id: None,
            phase: DetailPhase::Idle,
            show_shiny: false,
            diagnostics: DiagnosticLog::new(),
        }
    }
}

impl DetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(self, event: DetailEvent) -> Self {
        match event {
            DetailEvent::Requested(id) => Self {
                generation: self.generation + 1,
                id: Some(id),
                phase: DetailPhase::Loading,
                diagnostics: DiagnosticLog::new(),
                ..self
            },
            DetailEvent::Loaded {
                generation,
                outcome,
            } => {
                if generation != self.generation || self.phase != DetailPhase::Loading {
                    return self;
                }
                match outcome {
                    DetailOutcome::Found { page, diagnostics } => Self {
                        phase: DetailPhase::Ready(Box::new(page)),
                        diagnostics,
                        ..self
                    },
                    DetailOutcome::NotFound { id, error } => {
                        let mut diagnostics = DiagnosticLog::new();
                        diagnostics.push(Diagnostic {
                            scope: DiagnosticScope::Entry(id),
                            message: error.to_string(),
                        });
                        Self {
                            phase: DetailPhase::NotFound,
                            diagnostics,
                            ..self
                        }
                    }
                    DetailOutcome::Cancelled => Self {
                        phase: DetailPhase::Idle,
                        ..self
                    },
                }
            }
            DetailEvent::ShinyToggled(show_shiny) => Self { show_shiny, ..self },
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == DetailPhase::Loading
    }

    pub fn is_not_found(&self) -> bool {
        self.phase == DetailPhase::NotFound
    }

    pub fn page(&self) -> Option<&DetailPage> {
        match &self.phase {
            DetailPhase::Ready(page) => Some(page),
            _ => None,
        }
    }

    pub fn show_shiny(&self) -> bool {
        self.show_shiny
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }
}

//! The detail view: one entry with its species text and evolution line.

pub mod loader;
pub mod state;

pub use loader::{load_detail, DetailOutcome, DetailPage};
pub use state::{DetailEvent, DetailPhase, DetailState};

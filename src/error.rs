//! Typed failures surfaced at the engine boundary.
//!
//! Inside a tick nothing returns `Result` — every tick operation is total by
//! design. `EngineError` is only produced by `new_run`, `load`, and the
//! `SaveIo` boundary (no `thiserror` dependency; plain hand-rolled enum with
//! a `Display` impl).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EngineError {
    /// Malformed or missing fields in a data table or save blob.
    BadData(String),
    /// A caller-visible state violation, e.g. `tick()` before `new_run()`.
    InvariantBroken(String),
    /// A failure surfaced by the host's storage interface.
    SaveIo(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::BadData(msg) => write!(f, "bad data: {}", msg),
            EngineError::InvariantBroken(msg) => write!(f, "invariant broken: {}", msg),
            EngineError::SaveIo(msg) => write!(f, "save I/O error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

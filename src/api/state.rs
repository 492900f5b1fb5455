//! Application state for the HR workflow API.

use crate::engine::Engine;

/// Shared application state.
///
/// Holds the engine every handler calls into. Cloning is cheap; clones
/// share one store.
#[derive(Clone)]
pub struct AppState {
    engine: Engine,
}

impl AppState {
    /// Creates application state around an engine.
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

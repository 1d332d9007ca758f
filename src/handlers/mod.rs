pub mod chat;
pub mod help;
pub mod plan;
/// Handler modules for the fitness-coach MCP tools
pub mod transcript;

#[cfg(test)]
mod test_handlers;

use crate::engine::CoachEngine;
use crate::session::Session;
use crate::validation::InputValidator;
use std::sync::Arc;
use tokio::sync::Mutex;

// Re-export handler traits from submodules
pub use help::HelpHandler;

/// Handler for MCP tool operations.
///
/// Owns the single session behind a mutex; the completion-bound handlers
/// hold the lock for the full request/response exchange, which serializes
/// turns and keeps at most one completion request in flight.
pub struct CoachHandlers {
    pub(crate) engine: CoachEngine,
    pub(crate) session: Mutex<Session>,
    pub(crate) validator: Arc<InputValidator>,
    pub(crate) help: HelpHandler,
}

impl CoachHandlers {
    pub fn new(engine: CoachEngine, validator: Arc<InputValidator>) -> Self {
        Self {
            engine,
            session: Mutex::new(Session::new()),
            validator,
            help: HelpHandler::new(),
        }
    }
}

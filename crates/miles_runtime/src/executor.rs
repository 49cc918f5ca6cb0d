//! Command executors.

use miles_recognizer::CommandStructure;

/// Error type executors may return. It reaches the caller unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Runs a recognized command against a caller-supplied context.
pub trait CommandExecutor<C>: Send + Sync {
    /// Executes the command.
    ///
    /// # Errors
    /// Returns whatever domain error the command raises.
    fn execute(&self, command: &CommandStructure, context: &mut C) -> Result<(), BoxError>;
}

impl<C, F, E> CommandExecutor<C> for F
where
    F: Fn(&CommandStructure, &mut C) -> Result<(), E> + Send + Sync,
    E: Into<BoxError>,
{
    fn execute(&self, command: &CommandStructure, context: &mut C) -> Result<(), BoxError> {
        self(command, context).map_err(Into::into)
    }
}

//! Error types for the Miles recognition engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Build-time failures (grammar syntax, matcher conflicts, registration
//! problems) and run-time failures (recognition, executors) share one
//! [`Error`] type so callers can propagate them with `?`.

use std::fmt;

use thiserror::Error;

/// Result type alias using the Miles error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Miles operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a grammar syntax error.
    #[must_use]
    pub fn grammar_syntax(
        message: impl Into<String>,
        fragment: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::new(ErrorKind::GrammarSyntax(GrammarSyntaxError {
            message: message.into(),
            fragment: fragment.into(),
            offset,
        }))
    }

    /// Creates a matcher priority conflict error.
    #[must_use]
    pub fn matcher_conflict(connection: impl Into<String>, existing: i32, requested: i32) -> Self {
        Self::new(ErrorKind::Matcher(MatcherError {
            connection: connection.into(),
            existing,
            requested,
        }))
    }

    /// Creates a recognition failure at a 1-based token position.
    #[must_use]
    pub fn unrecognized(target: RecognitionTarget, position: usize, token: impl Into<String>) -> Self {
        Self::new(ErrorKind::Recognizer(RecognizerError {
            target,
            position: Some(position),
            token: Some(token.into()),
        }))
    }

    /// Creates a recognition failure caused by running out of input.
    #[must_use]
    pub fn unexpected_end(target: RecognitionTarget) -> Self {
        Self::new(ErrorKind::Recognizer(RecognizerError {
            target,
            position: None,
            token: None,
        }))
    }

    /// Creates an error wrapping a failure raised by a command executor.
    #[must_use]
    pub fn executor(source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(ErrorKind::Executor(source))
    }

    /// Returns the recognizer payload if this is a recognition failure.
    #[must_use]
    pub fn as_recognizer(&self) -> Option<&RecognizerError> {
        match &self.kind {
            ErrorKind::Recognizer(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the grammar syntax payload if this is a grammar failure.
    #[must_use]
    pub fn as_grammar_syntax(&self) -> Option<&GrammarSyntaxError> {
        match &self.kind {
            ErrorKind::GrammarSyntax(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the error raised by an executor, untouched, so callers can downcast it.
    #[must_use]
    pub fn executor_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match &self.kind {
            ErrorKind::Executor(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed grammar text.
    #[error(transparent)]
    GrammarSyntax(GrammarSyntaxError),

    /// Conflicting connection priorities while compiling a matcher.
    #[error(transparent)]
    Matcher(MatcherError),

    /// No accepting path was found for the input.
    #[error(transparent)]
    Recognizer(RecognizerError),

    /// A plugin with this name is already registered.
    #[error("plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// A namespace with this name is already registered.
    #[error("namespace already registered: {0}")]
    DuplicateNamespace(String),

    /// A command with this name already exists in the namespace.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    /// One namespace prefix is a prefix of another.
    #[error("prefix conflict: \"{requested}\" overlaps \"{existing}\"")]
    PrefixConflict {
        /// The prefix already registered.
        existing: String,
        /// The prefix being registered.
        requested: String,
    },

    /// A namespace was registered without any prefix words.
    #[error("namespace {0} has no prefix words")]
    EmptyPrefix(String),

    /// A namespace was requested by name but does not exist.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// A grammar uses a placeholder that has no analyzer bound to it.
    #[error("no analyzer bound to placeholder {0}")]
    UnknownMatching(String),

    /// A recognized command has no executor.
    #[error("no executor for command {0}")]
    MissingExecutor(String),

    /// Failure raised by a command executor, propagated unchanged.
    #[error("{0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Malformed grammar text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grammar at offset {offset} near \"{fragment}\": {message}")]
pub struct GrammarSyntaxError {
    /// Description of the problem.
    pub message: String,
    /// The offending substring of the grammar text.
    pub fragment: String,
    /// Byte offset of the fragment in the grammar text.
    pub offset: usize,
}

/// A connection was added twice with different priorities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "connection {connection} already exists with priority {existing}, requested priority {requested}"
)]
pub struct MatcherError {
    /// Description of the conflicting connection.
    pub connection: String,
    /// Priority already stored on the connection.
    pub existing: i32,
    /// Priority of the rejected addition.
    pub requested: i32,
}

/// Which recognizer flavor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionTarget {
    /// Selecting the namespace that owns the input.
    Namespace,
    /// Recognizing a command within a namespace.
    Command,
}

impl fmt::Display for RecognitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace => write!(f, "namespace"),
            Self::Command => write!(f, "command"),
        }
    }
}

/// No accepting path exists for the input.
///
/// `position` and `token` describe the furthest point any search branch
/// reached. Both are `None` when the input ran out first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to recognize {target}! {}", failure_detail(.position, .token))]
pub struct RecognizerError {
    /// The recognizer flavor that failed.
    pub target: RecognitionTarget,
    /// 1-based index of the offending token in the token stream.
    pub position: Option<usize>,
    /// The offending token.
    pub token: Option<String>,
}

impl RecognizerError {
    /// Returns true if recognition failed because the input ended early.
    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        self.position.is_none()
    }
}

fn failure_detail(position: &Option<usize>, token: &Option<String>) -> String {
    match (position, token) {
        (Some(position), Some(token)) => format!("Error at position {position}: {token}"),
        _ => "Unexpected end of input.".to_string(),
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Plugin being registered or dispatched to.
    pub plugin: Option<String>,
    /// Namespace involved.
    pub namespace: Option<String>,
    /// Command involved.
    pub command: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plugin name.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Sets the namespace name.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the command name.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("plugin", &self.plugin),
            ("namespace", &self.namespace),
            ("command", &self.command),
        ];
        let mut first = true;
        for (label, value) in parts {
            if let Some(value) = value {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "in {label} {value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

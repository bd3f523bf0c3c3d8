//! Error types for the Delver engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Delver operations.
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

    /// Creates a duplicate id error.
    #[must_use]
    pub fn duplicate_id(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::DuplicateId {
            entity,
            id: id.to_string(),
        })
    }

    /// Creates a missing reference error.
    #[must_use]
    pub fn missing_reference(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::MissingReference {
            entity,
            id: id.to_string(),
        })
    }

    /// Creates an invalid data error.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Two entities of the same kind share an id.
    #[error("duplicate {entity} id: {id}")]
    DuplicateId {
        /// The entity kind ("room", "artifact", ...).
        entity: &'static str,
        /// The offending id.
        id: String,
    },

    /// A reference points at an entity that does not exist.
    #[error("{entity} not found: {id}")]
    MissingReference {
        /// The entity kind that was looked up.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Loaded data is structurally valid but semantically wrong.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Save slot outside the supported range.
    #[error("invalid save slot: {0}")]
    InvalidSlot(u8),

    /// Save slot has nothing in it.
    #[error("no saved game in slot {0}")]
    EmptySlot(u8),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A command could not be registered with the parser.
    #[error("command registration failed: {0}")]
    CommandRegistration(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or adventure name.
    pub source: Option<String>,
    /// Chain of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}

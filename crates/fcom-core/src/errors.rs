use thiserror::Error;

/// Result type alias using FcomError
pub type Result<T> = std::result::Result<T, FcomError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// without parsing messages. The diff and resolver paths never produce
/// errors; these kinds cover ingestion and serialization only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,

    // Ingestion
    /// The override text is not JSON, or its root is neither an array nor an object
    InvalidOverrideDocument,
    /// One element of an override document cannot be read as an override entry
    InvalidOverrideEntry,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidOverrideDocument => "ERR_INVALID_OVERRIDE_DOCUMENT",
            ExErrorKind::InvalidOverrideEntry => "ERR_INVALID_OVERRIDE_ENTRY",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and
/// free-form context for humans reading logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    index: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            index: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (an override path or object name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the position of the offending element
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FcomError {
    // ===== Ingestion Errors =====
    #[error("Invalid override document: {reason}")]
    InvalidDocument { reason: String },

    #[error("Invalid override entry at index {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== Integration Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<FcomError> for ExError {
    fn from(err: FcomError) -> Self {
        let message = err.to_string();
        match err {
            FcomError::InvalidDocument { .. } => {
                ExError::new(ExErrorKind::InvalidOverrideDocument).with_message(message)
            }
            FcomError::InvalidEntry { index, .. } => {
                ExError::new(ExErrorKind::InvalidOverrideEntry)
                    .with_index(index)
                    .with_message(message)
            }
            FcomError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            FcomError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            FcomError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for FcomError {
    fn from(err: serde_json::Error) -> Self {
        FcomError::Serialization {
            message: err.to_string(),
        }
    }
}

//! Unified error types for structure-diff.
//!
//! This module provides the error hierarchy for the library, with
//! context chaining so that a failure deep in the loader still reports
//! which workdir, origin and unit it was processing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for structure-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StructureDiffError {
    /// Errors while locating, extracting or reading snapshots
    #[error("Failed to load snapshots: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// Preconditions that must hold before any diff work starts
    #[error("Comparison precondition failed: {context}")]
    Precondition {
        context: String,
        #[source]
        source: PreconditionErrorKind,
    },

    /// Errors during report or artifact generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Workdir {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Archive extraction failed: {0}")]
    Archive(String),

    #[error("Unit '{unit}' appears more than once under '{origin}'")]
    DuplicateUnit { origin: String, unit: String },

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Unexpected snapshot shape: {0}")]
    UnexpectedShape(String),
}

/// Specific precondition error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PreconditionErrorKind {
    #[error(
        "Projects in source and destination structures do not match \
         (missing in source: [{}], missing in destination: [{}])",
        .missing_in_source.join(", "),
        .missing_in_destination.join(", ")
    )]
    UnitMismatch {
        missing_in_source: Vec<String>,
        missing_in_destination: Vec<String>,
    },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for structure-diff operations
pub type Result<T> = std::result::Result<T, StructureDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl StructureDiffError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create a load error for a missing workdir
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(
            format!("Workdir file {} not found", path.display()),
            LoadErrorKind::NotFound(path),
        )
    }

    /// Create a load error for a document that does not have an expected shape
    pub fn unexpected_shape(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::load(context, LoadErrorKind::UnexpectedShape(detail.into()))
    }

    /// Create a precondition error for mismatching unit sets
    pub fn unit_mismatch(missing_in_source: Vec<String>, missing_in_destination: Vec<String>) -> Self {
        Self::Precondition {
            context: "comparing unit sets".to_string(),
            source: PreconditionErrorKind::UnitMismatch {
                missing_in_source,
                missing_in_destination,
            },
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Whether this error stems from a missing workdir
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Load {
                source: LoadErrorKind::NotFound(_),
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for StructureDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for StructureDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::load(
            "JSON deserialization",
            LoadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<zip::result::ZipError> for StructureDiffError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::load("archive extraction", LoadErrorKind::Archive(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to whatever context the error already
/// carries, producing chains like `"loading source: reading p1.json: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on the error path.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<StructureDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: StructureDiffError, new_ctx: &str) -> StructureDiffError {
    match err {
        StructureDiffError::Load {
            context: existing,
            source,
        } => StructureDiffError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StructureDiffError::Precondition {
            context: existing,
            source,
        } => StructureDiffError::Precondition {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StructureDiffError::Report {
            context: existing,
            source,
        } => StructureDiffError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        StructureDiffError::Io {
            path,
            message,
            source,
        } => StructureDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        StructureDiffError::Config(msg) => StructureDiffError::Config(chain_context(new_ctx, &msg)),
        StructureDiffError::Validation(msg) => {
            StructureDiffError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| StructureDiffError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| StructureDiffError::Validation(f().into()))
    }
}

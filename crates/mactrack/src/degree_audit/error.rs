//! Error types for the degree audit subsystem.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while validating a plan.
///
/// Plan data itself never produces an error; unknown courses are simply
/// not completed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The requisite lookup failed for a planned course
    #[error("Requisite lookup failed for {course}: {source}")]
    Lookup {
        course: String,
        #[source]
        source: BoxError,
    },
}

impl ValidationError {
    /// Wraps a lookup failure for the given course.
    pub fn lookup<E>(course: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ValidationError::Lookup {
            course: course.into(),
            source: Box::new(source),
        }
    }

    /// The course whose lookup failed.
    pub fn course(&self) -> &str {
        match self {
            ValidationError::Lookup { course, .. } => course,
        }
    }
}

/// Errors from loading an in-memory requisite table.
#[derive(Debug, Error)]
pub enum RequisiteError {
    #[error("Failed to read requisites: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse requisites JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Kind was not one of PREREQ, COREQ, ANTIREQ
    #[error("Unknown requisite kind '{kind}' for {course}")]
    UnknownKind { kind: String, course: String },
}

/// Errors from loading programs and plans from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

pub type LaunchpadResult<T> = Result<T, LaunchpadError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the launchpad backend
#[derive(Error, Debug)]
pub enum LaunchpadError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Git error: {message}")]
    Git {
        message: String,
        context: ErrorContext,
    },

    /// A failure talking to the generative model. `status` carries the
    /// provider's HTTP status when the request reached it.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        status: Option<u16>,
        context: ErrorContext,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LaunchpadError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            LaunchpadError::Config { context, .. } => Some(context),
            LaunchpadError::Validation { context, .. } => Some(context),
            LaunchpadError::Repository { context, .. } => Some(context),
            LaunchpadError::Git { context, .. } => Some(context),
            LaunchpadError::Llm { context, .. } => Some(context),
            LaunchpadError::Parse { context, .. } => Some(context),
            LaunchpadError::NotFound { context, .. } => Some(context),
            LaunchpadError::Io(_) | LaunchpadError::Serialization(_) => None,
        }
    }

    /// Short human readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            LaunchpadError::Config { message, .. }
            | LaunchpadError::Validation { message, .. }
            | LaunchpadError::Repository { message, .. }
            | LaunchpadError::Git { message, .. }
            | LaunchpadError::Llm { message, .. }
            | LaunchpadError::Parse { message, .. } => message.clone(),
            LaunchpadError::NotFound { resource, .. } => format!("{} not found", resource),
            LaunchpadError::Io(e) => e.to_string(),
            LaunchpadError::Serialization(e) => e.to_string(),
        }
    }

    /// Check if the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LaunchpadError::Validation { .. } | LaunchpadError::NotFound { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            LaunchpadError::Config { .. } | LaunchpadError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            LaunchpadError::Git { .. } | LaunchpadError::Llm { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Upstream error"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::LaunchpadError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your .env file or exported environment variables"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::LaunchpadError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::LaunchpadError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Verify the identifier"),
        }
    };
}

//! Error types for Estate Admin
//!
//! This module provides unified error handling across the workspace,
//! covering client-side validation, transport failures, server rejections,
//! response decoding, configuration, and local files.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Estate Admin
#[derive(Debug, Error)]
pub enum AdminError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required field is empty
    #[error("Field '{field}' is required for '{resource}'")]
    MissingField { resource: String, field: String },

    /// The field is not part of the resource schema
    #[error("Field '{field}' is not defined for '{resource}'")]
    UnknownField { resource: String, field: String },

    /// The value does not fit the field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// An operation needs an open edit session
    #[error("No edit session in progress")]
    NoEditSession,

    // ========================================================================
    // Transport / Server Errors
    // ========================================================================
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server rejected the request ({status}){}", message_suffix(.message))]
    Api { status: u16, message: Option<String> },

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// The response body did not have the expected shape
    #[error("Unexpected response for '{resource}': {message}")]
    Decode { resource: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Item is not in the last fetched list
    #[error("No '{resource}' item with id {id}")]
    ItemNotFound { resource: String, id: String },

    /// Resource name is not in the catalog
    #[error("Unknown resource: {0}")]
    ResourceNotFound(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // File Errors
    // ========================================================================
    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },
}

impl AdminError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AdminError::Validation(msg.into())
    }

    /// Create a missing-field error
    pub fn missing_field(resource: impl Into<String>, field: impl Into<String>) -> Self {
        AdminError::MissingField {
            resource: resource.into(),
            field: field.into(),
        }
    }

    /// Create an invalid-value error
    pub fn invalid_value(field: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::InvalidValue {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        AdminError::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::Decode {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a client-side validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AdminError::Validation(_)
                | AdminError::MissingField { .. }
                | AdminError::UnknownField { .. }
                | AdminError::InvalidValue { .. }
                | AdminError::NoEditSession
        )
    }

    /// Check if this error is a network/transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, AdminError::Transport(_))
    }

    /// Check if the server rejected the request
    pub fn is_server(&self) -> bool {
        matches!(self, AdminError::Api { .. })
    }

    /// HTTP status of a server rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a user-visible notification
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Transport(_) => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            AdminError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            AdminError::Api {
                status: 401 | 403, ..
            } => "You are not authorized to perform this action.".to_string(),
            AdminError::Api { status, .. } => format!("Server returned status {status}"),
            AdminError::Decode { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

// ============================================================================
// Tests
// ============================================================================

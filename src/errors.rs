// ABOUTME: Unified error handling for the SousChef recipe engine
// ABOUTME: Defines ErrorCode, AppError and constructor helpers shared across all modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SousChef AI

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the SousChef
//! recipe engine. It defines the standard error codes used across the AI
//! gateway, normalization pipeline and search orchestration so that callers
//! never need to know which provider variant is active.
//!
//! The two provider failure kinds that matter to callers are kept apart:
//! [`ErrorCode::ExternalServiceError`] (the transport could not be completed)
//! and [`ErrorCode::MalformedResponse`] (content arrived but carried no
//! extractable JSON).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    /// External services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Provider content parsed but contained no extractable JSON
    #[serde(rename = "MALFORMED_RESPONSE")]
    MalformedResponse = 5001,

    /// Configuration (6000-6999)
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6000,
    /// Configuration value present but unusable
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6001,

    /// Internal errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Recipe storage collaborator failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9001,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::MalformedResponse => "The AI provider returned an unparseable response",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Recipe storage operation failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {message}", .code.description())]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this is a transport-level provider failure (connection error,
    /// non-2xx status, non-zero subprocess exit)
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self.code, ErrorCode::ExternalServiceError)
    }

    /// Whether the provider answered but its content carried no usable JSON
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self.code, ErrorCode::MalformedResponse)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Missing configuration value
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// External service (transport) error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Provider response carried no extractable JSON
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedResponse, message)
    }

    /// Recipe storage failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_discriminators() {
        let transport = AppError::external_service("Ollama", "connection refused");
        assert!(transport.is_transport_failure());
        assert!(!transport.is_malformed_response());

        let malformed = AppError::malformed_response("no JSON found in response");
        assert!(malformed.is_malformed_response());
        assert!(!malformed.is_transport_failure());
    }

    #[test]
    fn test_display_includes_description_and_message() {
        let error = AppError::config("unknown AI provider: bard");
        let rendered = error.to_string();
        assert!(rendered.contains("Configuration is invalid"));
        assert!(rendered.contains("bard"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::MalformedResponse).unwrap();
        assert_eq!(json, "\"MALFORMED_RESPONSE\"");
    }
}
